//! Distributes the tokens after the command path over its parameters.
//!
//! Every pass works on a list of token indices and hands a reduced list to
//! the next one, so no token can be claimed twice:
//!
//! 1. the named pass claims flags and their values,
//! 2. the positional pass fills the remaining parameters in order,
//! 3. array parameters are assembled from everything they collected,
//! 4. whatever is left belongs to the unassigned bucket.

use crate::{
  argument::Argument,
  assignment::Slot,
  command::Parameter,
  config::RequisitionConfig,
  token::Token,
  types::TypeKind,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
  /// One entry per parameter. `None` means nothing was bound and the
  /// parameter takes its default.
  pub args:     Vec<Option<Argument>>,
  /// Indices of tokens no parameter claimed, in input order.
  pub leftover: Vec<usize>,
  /// The owner of every token, by index.
  pub owners:   Vec<Slot>,
}

impl Binding {
  fn empty(params: usize, tokens: usize) -> Self {
    Self {
      args:     vec![None; params],
      leftover: Vec::new(),
      owners:   vec![Slot::Unassigned; tokens],
    }
  }

  fn claim(&mut self, index: usize, slot: Slot) {
    self.owners[index] = slot;
  }

  /// The leftover tokens as one argument for the unassigned bucket.
  pub fn leftover_argument(&self, tokens: &[Token]) -> Argument {
    if self.leftover.is_empty() {
      return Argument::Blank;
    }
    Argument::Array(
      self
        .leftover
        .iter()
        .map(|&i| Argument::Single(tokens[i].clone()))
        .collect(),
    )
  }
}

/// Binds `tokens` to `params`. `params` is `None` when no command resolved.
pub fn bind(params: Option<&[Parameter]>, tokens: &[Token], config: &RequisitionConfig) -> Binding {
  let Some(params) = params else {
    let mut binding = Binding::empty(0, tokens.len());
    binding.leftover = (0..tokens.len()).collect();
    return binding;
  };
  let mut binding = Binding::empty(params.len(), tokens.len());

  if tokens.is_empty() {
    return binding;
  }

  if params.is_empty() {
    binding.leftover = (0..tokens.len()).collect();
    return binding;
  }

  if config.greedy_text
    && let [param] = params
    && param.positional
    && param.kind() == TypeKind::Text
  {
    binding.args[0] = Some(Argument::from_tokens(tokens));
    for i in 0..tokens.len() {
      binding.claim(i, Slot::Param(0));
    }
    return binding;
  }

  let mut arrays: Vec<Option<Vec<Argument>>> = vec![None; params.len()];
  let mut duplicates = Vec::new();

  // Named pass.
  let mut pool = Vec::with_capacity(tokens.len());
  let mut indices = 0..tokens.len();
  while let Some(i) = indices.next() {
    let Some(p) = params
      .iter()
      .position(|param| param.is_named_param(tokens[i].text()))
    else {
      pool.push(i);
      continue;
    };

    let mut claimed = vec![i];
    let arg = if params[p].kind() == TypeKind::Boolean {
      Argument::TrueNamed(tokens[i].clone())
    } else {
      let value = indices.next();
      claimed.extend(value);
      Argument::Named {
        name:  tokens[i].clone(),
        value: value.map(|j| tokens[j].clone()),
      }
    };

    if params[p].kind() == TypeKind::Array {
      arrays[p].get_or_insert_with(Vec::new).push(arg);
    } else if binding.args[p].is_some() {
      duplicates.extend(claimed);
      continue;
    } else {
      binding.args[p] = Some(arg);
    }
    for j in claimed {
      binding.claim(j, Slot::Param(p));
    }
  }

  // Positional pass.
  let mut pool = pool.into_iter();
  for (p, param) in params.iter().enumerate() {
    if !param.positional || binding.args[p].is_some() || arrays[p].is_some() {
      continue;
    }

    if param.kind() == TypeKind::Array {
      let rest: Vec<_> = pool.by_ref().collect();
      if !rest.is_empty() {
        for &i in &rest {
          binding.claim(i, Slot::Param(p));
        }
        arrays[p] = Some(
          rest
            .into_iter()
            .map(|i| Argument::Single(tokens[i].clone()))
            .collect(),
        );
      }
      continue;
    }

    if let Some(i) = pool.next() {
      binding.args[p] = Some(Argument::Single(tokens[i].clone()));
      binding.claim(i, Slot::Param(p));
    }
  }

  // Array finalize pass.
  for (p, members) in arrays.into_iter().enumerate() {
    if let Some(members) = members {
      binding.args[p] = Some(Argument::Array(members));
    }
  }

  let mut leftover: Vec<_> = pool.chain(duplicates).collect();
  leftover.sort_unstable();
  for &i in &leftover {
    binding.claim(i, Slot::Unassigned);
  }
  binding.leftover = leftover;

  tracing::trace!(
    params = params.len(),
    tokens = tokens.len(),
    leftover = binding.leftover.len(),
    "bound parameters"
  );
  binding
}

use super::declare::Declared;
use super::Bindings;

/// Resolves every queued use and finalizes constancy and export flags.
pub fn resolve(declared: Declared) -> Bindings {
  let Declared {
    mut bindings,
    uses,
    exports,
  } = declared;
  for pending in uses {
    match bindings.resolve_name_in_scope(pending.scope, &pending.name) {
      Some(symbol) => {
        bindings.resolved.insert(pending.node, symbol);
        let binding = &mut bindings.symbols[symbol.raw() as usize];
        match pending.violation {
          // A destructuring target can name the same binding twice.
          Some(violation) if binding.violations.last() != Some(&violation) => {
            binding.violations.push(violation)
          }
          Some(_) => {}
          None => binding.references.push(pending.node),
        };
      }
      None => {
        bindings.free_names.insert(pending.name);
      }
    };
  }
  for (scope, name) in exports {
    if let Some(symbol) = bindings.resolve_name_in_scope(scope, &name) {
      bindings.symbols[symbol.raw() as usize].exported = true;
    };
  }
  for binding in bindings.symbols.iter_mut() {
    binding.constant = binding.violations.is_empty();
  }
  bindings
}

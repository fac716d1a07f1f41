//! Lexical environments.
//!
//! An [`Env`] is a shared handle to a scope. Closures keep their defining
//! scope alive by holding a clone of the handle, so two closures created in
//! the same call observe each other's writes.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::errors::errors::ErrorImpl;

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutability: Mutability,
}

/// Why an assignment to a binding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    Immutable,
    Undefined,
}

pub struct Environment {
    bindings: HashMap<String, Binding>,
    parent: Option<Env>,
    kind: ScopeKind,
}

#[derive(Clone)]
pub struct Env(Rc<RefCell<Environment>>);

impl Env {
    pub fn new_global() -> Self {
        Env::from_environment(Environment {
            bindings: HashMap::new(),
            parent: None,
            kind: ScopeKind::Global,
        })
    }

    fn from_environment(environment: Environment) -> Self {
        Env(Rc::new(RefCell::new(environment)))
    }

    pub fn child(&self, kind: ScopeKind) -> Env {
        Env::from_environment(Environment {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
            kind,
        })
    }

    pub fn kind(&self) -> ScopeKind {
        self.0.borrow().kind
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Adds a binding to this scope. Fails if the name is already bound here.
    pub fn declare(
        &self,
        name: &str,
        value: Value,
        mutability: Mutability,
    ) -> Result<(), ErrorImpl> {
        let mut environment = self.0.borrow_mut();
        if environment.bindings.contains_key(name) {
            return Err(ErrorImpl::VariableAlreadyDeclared {
                variable: name.to_string(),
            });
        }
        environment
            .bindings
            .insert(name.to_string(), Binding { value, mutability });
        Ok(())
    }

    /// Binds a mutable name in this scope, replacing any existing binding.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(
            name.to_string(),
            Binding {
                value,
                mutability: Mutability::Mutable,
            },
        );
    }

    /// Binds a read-only name in this scope, replacing any existing binding.
    pub fn define_immutable(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(
            name.to_string(),
            Binding {
                value,
                mutability: Mutability::Immutable,
            },
        );
    }

    /// Binds a `var` or function declaration in this scope. An existing
    /// mutable binding is overwritten, or kept as is when `value` is `None`.
    /// A `const` of the same name cannot be redeclared.
    pub fn declare_var(&self, name: &str, value: Option<Value>) -> Result<(), ErrorImpl> {
        let mut environment = self.0.borrow_mut();

        if let Some(binding) = environment.bindings.get_mut(name) {
            if binding.mutability == Mutability::Immutable {
                return Err(ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                });
            }
            if let Some(value) = value {
                binding.value = value;
            }
            return Ok(());
        }

        environment.bindings.insert(
            name.to_string(),
            Binding {
                value: value.unwrap_or(Value::Undefined),
                mutability: Mutability::Mutable,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let environment = current.0.borrow();
                if let Some(binding) = environment.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                environment.parent.clone()
            };
            current = parent?;
        }
    }

    /// Updates the nearest binding of `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut environment = current.0.borrow_mut();
                if let Some(binding) = environment.bindings.get_mut(name) {
                    if binding.mutability == Mutability::Immutable {
                        return Err(AssignError::Immutable);
                    }
                    binding.value = value;
                    return Ok(());
                }
                environment.parent.clone()
            };
            current = parent.ok_or(AssignError::Undefined)?;
        }
    }

    /// The nearest function or global scope, where `var` lives.
    pub fn function_scope(&self) -> Env {
        let mut current = self.clone();
        loop {
            let parent = {
                let environment = current.0.borrow();
                if environment.kind != ScopeKind::Block {
                    None
                } else {
                    environment.parent.clone()
                }
            };
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    pub fn global(&self) -> Env {
        let mut current = self.clone();
        loop {
            let parent = current.0.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// A sibling scope holding copies of this scope's bindings. Used to give
    /// each `for (let ...)` iteration its own variables.
    pub fn copy_bindings(&self) -> Env {
        let environment = self.0.borrow();
        Env::from_environment(Environment {
            bindings: environment.bindings.clone(),
            parent: environment.parent.clone(),
            kind: environment.kind,
        })
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let environment = self.0.borrow();
        let mut names = environment.bindings.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Env")
            .field("kind", &environment.kind)
            .field("bindings", &names)
            .finish_non_exhaustive()
    }
}

//! Which module and function the hub is showing, and the form built for it

use crate::hub::form::ParamForm;
use crate::hub::function::{UtilityFunction, UtilityModule};
use crate::hub::registry::Registry;

#[derive(Debug, Default)]
pub struct Selection {
    module: Option<String>,
    function: Option<String>,
    pub form: ParamForm,
}

impl Selection {
    pub fn module_name(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn module<'r>(&self, registry: &'r Registry) -> Option<&'r UtilityModule> {
        registry.get(self.module.as_deref()?)
    }

    pub fn function<'r>(&self, registry: &'r Registry) -> Option<&'r UtilityFunction> {
        registry.function(self.module.as_deref()?, self.function.as_deref()?)
    }

    pub fn reset(&mut self) {
        self.module = None;
        self.function = None;
        self.form.clear();
    }

    /// Select `name` and its first function by name; a module without
    /// functions leaves the form empty
    pub fn select_module(&mut self, registry: &Registry, name: &str) {
        let first = registry
            .get(name)
            .and_then(|module| module.function_names().next().map(String::from));
        self.module = Some(name.to_string());
        match first {
            Some(function) => self.select_function(registry, &function),
            None => {
                self.function = None;
                self.form.clear();
            }
        }
    }

    /// Rebuild the form from scratch for `name` in the current module
    pub fn select_function(&mut self, registry: &Registry, name: &str) {
        let spec = self
            .module
            .as_deref()
            .and_then(|module| registry.function(module, name))
            .map(|function| function.spec().clone());
        match spec {
            Some(spec) => {
                self.form = ParamForm::for_function(&spec);
                self.function = Some(name.to_string());
            }
            None => {
                self.form.clear();
                self.function = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::console::Console;
    use crate::types::{FunctionSpec, ParamKind, ParamSpec};

    fn registry() -> Registry {
        let (console, _rx) = Console::new();
        let mut registry = Registry::discover(&[], &console);
        let module = UtilityModule::new("util_custom", "Custom")
            .with_function(UtilityFunction::new(
                FunctionSpec::new("b_second", "").param(ParamSpec::new("flag", ParamKind::Bool)),
                |_, _| Ok(None),
            ))
            .with_function(UtilityFunction::new(
                FunctionSpec::new("a_first", "")
                    .param(ParamSpec::new("count", ParamKind::Int).with_default(2i64))
                    .param(ParamSpec::new("label", ParamKind::Str)),
                |_, _| Ok(None),
            ));
        registry.register(module).unwrap();
        registry.register(UtilityModule::new("util_bare", "Nothing")).unwrap();
        registry
    }

    fn field_names(selection: &mut Selection) -> Vec<String> {
        selection
            .form
            .fields_mut()
            .iter()
            .map(|f| f.spec.name.clone())
            .collect()
    }

    #[test]
    fn test_select_module_picks_first_function_by_name() {
        let registry = registry();
        let mut selection = Selection::default();
        selection.select_module(&registry, "util_custom");

        assert_eq!(selection.module_name(), Some("util_custom"));
        assert_eq!(selection.function_name(), Some("a_first"));
        assert_eq!(selection.function(&registry).unwrap().name(), "a_first");
        assert_eq!(field_names(&mut selection), vec!["count", "label"]);
    }

    #[test]
    fn test_module_without_functions_clears_form() {
        let registry = registry();
        let mut selection = Selection::default();
        selection.select_module(&registry, "util_custom");
        selection.select_module(&registry, "util_bare");

        assert_eq!(selection.module(&registry).unwrap().description, "Nothing");
        assert_eq!(selection.function_name(), None);
        assert!(selection.function(&registry).is_none());
        assert!(selection.form.is_empty());
    }

    #[test]
    fn test_select_function_rebuilds_form() {
        let registry = registry();
        let mut selection = Selection::default();
        selection.select_module(&registry, "util_custom");
        selection.form.set("count", "9").unwrap();

        selection.select_function(&registry, "b_second");
        assert_eq!(field_names(&mut selection), vec!["flag"]);

        selection.select_function(&registry, "a_first");
        let args = selection.form.coerce().unwrap();
        assert_eq!(args.get("count"), Some(&crate::types::Value::Int(2)));
    }

    #[test]
    fn test_unknown_function_and_reset() {
        let registry = registry();
        let mut selection = Selection::default();
        selection.select_module(&registry, "util_custom");
        selection.select_function(&registry, "missing");
        assert_eq!(selection.function_name(), None);
        assert!(selection.form.is_empty());

        selection.select_module(&registry, "util_custom");
        selection.reset();
        assert_eq!(selection.module_name(), None);
        assert!(selection.form.is_empty());
    }
}

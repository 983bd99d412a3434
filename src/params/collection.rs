//! The ordered collection of parameters declared on one process.
//!
//! Populated append-only during declaration parsing and read-only once the
//! process starts executing. Declaration order is matching priority order,
//! so every view preserves it.

use std::any::Any;

use crate::error::Result;
use crate::params::base::{DeclaredParam, ParamKind};

/// Ordered container for one process's declared parameters. A thin
/// wrapper over a growable sequence; only the operations the declaration
/// and execution engines need are exposed.
#[derive(Default)]
pub struct ParamList {
    inner: Vec<Box<dyn DeclaredParam>>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping declaration order.
    pub fn push(&mut self, param: impl DeclaredParam + 'static) {
        self.inner.push(Box::new(param));
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn DeclaredParam> {
        self.inner.get(index).map(|p| p.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DeclaredParam> {
        self.inner.iter().map(|p| p.as_ref())
    }

    /// The name of every member in declaration order, `None` entries
    /// preserved. Fails if any member's name is queried before binding.
    pub fn names(&self) -> Result<Vec<Option<String>>> {
        self.inner
            .iter()
            .map(|p| p.name().map(|n| n.map(String::from)))
            .collect()
    }

    /// Members whose kind is one of the given kinds, declaration order
    /// preserved. Matching is exact.
    pub fn of_kind(&self, kinds: &[ParamKind]) -> Vec<&dyn DeclaredParam> {
        self.inner
            .iter()
            .filter(|p| kinds.contains(&p.kind()))
            .map(|p| p.as_ref())
            .collect()
    }

    /// Members of one concrete type, declaration order preserved.
    pub fn of_type<P: Any>(&self) -> Vec<&P> {
        self.inner
            .iter()
            .filter_map(|p| p.as_any().downcast_ref::<P>())
            .collect()
    }

    /// Propagate the singleton policy to every member supporting it;
    /// members without the capability are skipped silently.
    pub fn set_singleton(&mut self, flag: bool) {
        for param in self.inner.iter_mut() {
            param.set_singleton(flag);
        }
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a dyn DeclaredParam;
    type IntoIter = Box<dyn Iterator<Item = &'a dyn DeclaredParam> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.inner.iter().map(|p| p.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::binding::BindValue;
    use crate::params::file_pattern::FilePatternParam;
    use crate::params::value::{StdoutOutputParam, ValueOutputParam};

    /// A parameter without the singleton capability, for checking that
    /// bulk propagation skips it without error.
    #[derive(Debug)]
    struct FixedParam {
        index: usize,
    }

    impl DeclaredParam for FixedParam {
        fn kind(&self) -> ParamKind {
            ParamKind::ValueOutput
        }

        fn index(&self) -> usize {
            self.index
        }

        fn name(&self) -> Result<Option<&str>> {
            Ok(Some("fixed"))
        }

        fn lazy_init(&self) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn sample_list() -> ParamList {
        let mut list = ParamList::new();

        let mut file_a = FilePatternParam::new(0);
        file_a.bind(BindValue::var("first"));
        list.push(file_a);

        let mut value = ValueOutputParam::new(1);
        value.bind(BindValue::var("coverage"));
        list.push(value);

        let mut file_b = FilePatternParam::new(2);
        file_b.bind("*.log");
        list.push(file_b);

        list
    }

    #[test]
    fn test_names_preserve_order_and_nulls() {
        let list = sample_list();
        let names = list.names().unwrap();
        assert_eq!(
            names,
            vec![
                Some("first".to_string()),
                Some("coverage".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_of_kind_filters_in_declaration_order() {
        let list = sample_list();
        let files = list.of_kind(&[ParamKind::FileOutput]);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].index(), 0);
        assert_eq!(files[1].index(), 2);

        let all = list.of_kind(&[ParamKind::FileOutput, ParamKind::ValueOutput]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_of_type_downcasts_in_order() {
        let list = sample_list();
        let files = list.of_type::<FilePatternParam>();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].index(), 0);
        assert_eq!(files[1].index(), 2);
        assert_eq!(list.of_type::<StdoutOutputParam>().len(), 0);
    }

    #[test]
    fn test_set_singleton_round_trip() {
        let mut list = sample_list();
        list.push(FixedParam { index: 3 });

        list.set_singleton(true);
        list.set_singleton(false);

        for file in list.of_type::<FilePatternParam>() {
            assert!(!file.is_singleton());
        }
        for value in list.of_type::<ValueOutputParam>() {
            assert!(!value.is_singleton());
        }
        // The incapable member is untouched and raised no error
        assert_eq!(list.of_type::<FixedParam>()[0].name().unwrap(), Some("fixed"));
    }

    #[test]
    fn test_sequence_operations_delegate() {
        let list = sample_list();
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
        assert_eq!(list.get(1).unwrap().index(), 1);
        assert!(list.get(9).is_none());
        assert_eq!(list.iter().count(), 3);
        assert_eq!((&list).into_iter().count(), 3);
    }
}

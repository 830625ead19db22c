use std::collections::HashMap;

/// Static metadata about the capture groups of a compiled pattern.
///
/// Group `0` is the implicit group spanning the whole match; explicit groups are numbered from `1` in the order of
/// their opening parenthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureTable {
    names: Vec<Option<String>>,
    parents: Vec<Option<usize>>,
    index: HashMap<String, usize>,
}

impl Default for CaptureTable {
    fn default() -> Self {
        CaptureTable {
            names: vec![None],
            parents: vec![None],
            index: HashMap::new(),
        }
    }
}

impl CaptureTable {
    /// Register a new group nested in `parent`, returning its index.
    pub(crate) fn push(&mut self, name: Option<String>, parent: usize) -> usize {
        let index = self.names.len();

        if let Some(ref name) = name {
            self.index.insert(name.clone(), index);
        }

        self.names.push(name);
        self.parents.push(Some(parent));

        index
    }

    /// The number of groups, including the whole-match group `0`.
    pub fn num_groups(&self) -> usize {
        self.names.len()
    }

    /// The name of the group at `index`, if it is a named group.
    pub fn group_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(|name| name.as_deref())
    }

    /// The index of the group with the given name.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The innermost group enclosing the group at `index`; `None` for group `0`.
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Iterate the optional names of all groups in index order.
    pub fn names(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.names.iter().map(|name| name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_table() {
        let mut table = CaptureTable::default();

        assert_eq!(table.num_groups(), 1);
        assert_eq!(table.parent(0), None);

        let outer = table.push(Some("year".into()), 0);
        let inner = table.push(None, outer);

        assert_eq!(table.num_groups(), 3);
        assert_eq!(table.group_name(1), Some("year"));
        assert_eq!(table.group_name(2), None);
        assert_eq!(table.group_name(7), None);
        assert_eq!(table.group_index("year"), Some(1));
        assert_eq!(table.parent(inner), Some(outer));
        assert_eq!(table.names().collect::<Vec<_>>(), vec![None, Some("year"), None]);
    }
}

/// Generates names for numbered similarity group folders
pub struct FolderGenerator {
    prefix: String,
}

impl FolderGenerator {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Folder name for a 1-based group number, e.g. `group_3`
    pub fn group_folder(&self, number: usize) -> String {
        format!("{}_{}", self.prefix, number)
    }

    /// Parse the number back out of a folder produced by `group_folder`
    pub fn parse_group_number(&self, name: &str) -> Option<usize> {
        let rest = name.strip_prefix(self.prefix.as_str())?.strip_prefix('_')?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }

    /// Highest group number among existing folder names, 0 if none
    pub fn highest_existing<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.parse_group_number(name.as_ref()))
            .max()
            .unwrap_or(0)
    }
}

impl Default for FolderGenerator {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_GROUP_PREFIX)
    }
}

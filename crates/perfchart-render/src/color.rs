use indexmap::IndexMap;
use perfchart_core::BuildRecord;

/// Fill used for points whose build label carried no branch.
pub const UNKNOWN_BRANCH_COLOR: &str = "#000000";

/// Ordinal branch → colour assignment.
///
/// Branches receive palette entries in first-seen order over the dataset, wrapping around when
/// there are more branches than colours. The assignment is fixed once built, so every panel
/// (and every render of the same dataset) agrees on a branch's colour.
#[derive(Debug, Clone, Default)]
pub struct BranchPalette {
    colors: IndexMap<String, String>,
}

impl BranchPalette {
    pub fn from_records(records: &[BuildRecord], palette: &[String]) -> Self {
        let mut colors: IndexMap<String, String> = IndexMap::new();
        for branch in records.iter().filter_map(|r| r.branch_label.as_deref()) {
            if colors.contains_key(branch) || palette.is_empty() {
                continue;
            }
            let color = palette[colors.len() % palette.len()].clone();
            colors.insert(branch.to_string(), color);
        }
        Self { colors }
    }

    pub fn color_for(&self, branch: Option<&str>) -> &str {
        branch
            .and_then(|b| self.colors.get(b))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_BRANCH_COLOR)
    }

    /// Branches with their colours, in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(b, c)| (b.as_str(), c.as_str()))
    }
}

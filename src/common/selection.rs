use crate::common;

/// Attributes to return from a read (projection expression).
///
/// Each entry is a dotted attribute path.
///
/// ```rust
/// use dynamodb_resource::common::selection;
///
/// let selection = selection::Selection::from(["id", "address.city"]);
/// assert_eq!(selection.paths.len(), 2);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection {
    /// Attribute paths to project.
    pub paths: Vec<String>,
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Selection {
    fn from(paths: [S; N]) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Selection {
    pub(crate) fn render(&self, builder: &mut common::ExpressionBuilder) -> String {
        self.paths
            .iter()
            .map(|path| builder.name(path))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

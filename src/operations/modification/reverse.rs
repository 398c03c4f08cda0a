use crate::geometry::Path;

/// Reverses the vertex order of every path, flipping the orientation of
/// closed ones.
#[derive(Debug, Clone)]
pub struct ReversePaths {
    paths: Vec<Path>,
}

impl ReversePaths {
    /// Creates the operation over a set of paths.
    #[must_use]
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Executes the reversal.
    #[must_use]
    pub fn execute(self) -> Vec<Path> {
        let mut paths = self.paths;
        for path in &mut paths {
            path.reverse();
        }
        paths
    }
}

/// Screens a session can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    TestsCatalog,
    Results,
}

impl Destination {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Destination::TestsCatalog => "/tests",
            Destination::Results => "/results",
        }
    }
}

/// Front-end router seen by the session runner.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

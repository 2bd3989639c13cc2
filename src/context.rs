/// Supplies the ambient "current page" URL used when a call passes no URL.
pub trait Location: Send + Sync {
    fn href(&self) -> String;
}

/// A fixed URL. The default is the empty string, i.e. no query at all.
#[derive(Debug, Clone, Default)]
pub struct StaticLocation(pub String);

impl StaticLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl Location for StaticLocation {
    fn href(&self) -> String {
        self.0.clone()
    }
}

impl<F> Location for F
where
    F: Fn() -> String + Send + Sync,
{
    fn href(&self) -> String {
        self()
    }
}

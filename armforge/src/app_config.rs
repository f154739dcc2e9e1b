pub trait AppConfigProvider {
    /// Whether the application runs in development mode. In development the
    /// skeleton is re-read on every submission so it can be edited without a
    /// restart.
    fn is_dev_mode(&self) -> bool;
}


/// Interface to a backend.
pub trait Backend {
    /// Run until the machine stops or the backend is asked to quit.
    fn run(&mut self) -> anyhow::Result<()>;
}

/// Runs repository work from a UI handler. Desktop builds call straight
/// through; the seam exists so a threaded executor can replace it.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}

/// Token captured before a remote call and checked before its result is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic per-grid request counter. Only the most recently issued token
/// is current; `invalidate` retires every outstanding one.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    latest: u64,
}

impl RequestGate {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// Service deciding whether a submitted password unlocks admin mode
pub trait AdminGate: Clone {
    /// Check a candidate password against the configured secret
    fn verify(&self, candidate: &str) -> bool;
}

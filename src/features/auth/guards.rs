/// Shared-secret comparison used by both the login endpoint and the admin
/// route gate. Kept as a pure function so the authorization rule is testable
/// on its own and not woven into request plumbing.
pub fn verify_admin_secret(supplied: Option<&str>, configured: &str) -> bool {
    supplied == Some(configured)
}

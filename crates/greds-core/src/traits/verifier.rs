use crate::errors::LibraryResult;
use crate::models::{Claim, VerificationRecord};

/// Citation verification.
pub trait IVerifier: Send + Sync {
    /// Score one claim against its citations and append the record.
    fn verify(&self, claim: &Claim) -> LibraryResult<VerificationRecord>;
}

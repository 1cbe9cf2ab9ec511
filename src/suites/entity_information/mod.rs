pub mod test;

use crate::name::{NameError, NameResolver};
use crate::suite::NamedTest;

use test::{DisplayNameMatches, RedirectSigningDeclared, SupportContactPresent};

pub(super) fn register(names: &mut NameResolver) -> Result<(), NameError> {
    names
        .register_test::<SupportContactPresent>()?
        .register_test::<DisplayNameMatches>()?
        .register_test::<RedirectSigningDeclared>()?;
    Ok(())
}

pub(super) fn tests(names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
    Ok(vec![
        names.named(SupportContactPresent)?,
        names.named(DisplayNameMatches)?,
        names.named(RedirectSigningDeclared)?,
    ])
}

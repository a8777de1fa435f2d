pub(crate) mod doom;
pub(crate) mod explore;
pub(crate) mod helpers;

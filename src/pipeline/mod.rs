pub(crate) mod export;
pub(crate) mod result;
pub(crate) mod session;
pub(crate) mod token;

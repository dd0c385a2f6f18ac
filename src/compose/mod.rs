pub(crate) mod compositor;
pub(crate) mod gradient;
pub(crate) mod layout;
pub(crate) mod model;
pub(crate) mod paint;
pub(crate) mod text;

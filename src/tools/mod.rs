pub(crate) mod background;
pub(crate) mod cropper;
pub(crate) mod icons;
pub(crate) mod mockup;
pub(crate) mod screenshots;

pub(crate) mod compositor;
pub(crate) mod params;
pub(crate) mod pipeline;
pub(crate) mod shift;
pub(crate) mod texture;

pub(crate) mod gif;
pub(crate) mod sequence;
pub(crate) mod sink;

pub(crate) mod console;
pub(crate) mod load;
pub(crate) mod migrate;

mod input;
mod lifecycle;
mod remote;
mod watchers;

#[cfg(test)]
pub(crate) mod testing;

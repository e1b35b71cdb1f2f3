pub mod error;
pub mod response;

#[cfg(test)]
pub mod test_support;

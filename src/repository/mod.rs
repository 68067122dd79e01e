mod traits;
mod redis_impl;

#[cfg(test)]
mod test_mock;

pub use traits::ThoughtStorage;

#[cfg(test)]
pub use traits::MockThoughtStorage;

pub use redis_impl::RedisRepository;

#[cfg(test)]
pub use test_mock::MockRepository;

use redis::RedisResult;
use std::borrow::Cow;

pub(crate) fn read_value_as_str<'a>(
    v: Option<&'a redis::Value>,
    err_desc: &'static str,
) -> RedisResult<Cow<'a, str>> {
    match v {
        Some(redis::Value::Data(d)) => Ok(String::from_utf8_lossy(d.as_slice())),
        Some(other) => Err(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            err_desc,
            format!("{other:?}"),
        ))),
        None => Err(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            err_desc,
        ))),
    }
}

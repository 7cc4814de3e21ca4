/// Read-through caching for provider calls.
///
/// Returns the cached value for `$key` if present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds
/// to live, and returns it. A cache read failure counts as a miss: provider
/// calls must not fail because Redis is unavailable.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_CACHE_TTL, async move {
///     self.get_json(&format!("/movie/{}", id), &[]).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            result => {
                if let Err(e) = result {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}

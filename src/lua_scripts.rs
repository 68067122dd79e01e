/// Lua script constants for atomic Redis operations
/// These run server-side so each one is a single atomic step

/// Script to like a thought: increment its hearts and return the updated hash
///
/// KEYS[1] = thought key ({prefix}:Thoughts:{uuid})
///
/// ARGV[1] = increment (always 1 from the service)
///
/// Returns: flat HGETALL array of the updated thought, or nil if it does not exist
pub const LIKE_THOUGHT_SCRIPT: &str = r#"
-- Never create a record for an unknown id
if redis.call('EXISTS', KEYS[1]) == 0 then
    return nil
end

redis.call('HINCRBY', KEYS[1], 'hearts', tonumber(ARGV[1]))

return redis.call('HGETALL', KEYS[1])
"#;

/// Script to fetch the most recent thoughts
///
/// KEYS[1] = recency index key ({prefix}:Thoughts:by_created)
///
/// ARGV[1] = maximum number of thoughts
/// ARGV[2] = thought key prefix ({prefix}:Thoughts:)
///
/// Returns: array of flat HGETALL arrays, newest first
pub const RECENT_THOUGHTS_SCRIPT: &str = r#"
local limit = tonumber(ARGV[1])
if limit <= 0 then
    return {}
end

local ids = redis.call('ZREVRANGE', KEYS[1], 0, limit - 1)
local results = {}

for _, id in ipairs(ids) do
    local fields = redis.call('HGETALL', ARGV[2] .. id)
    if #fields > 0 then
        table.insert(results, fields)
    end
end

return results
"#;

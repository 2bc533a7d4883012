//! 面板刷新週期示例：第一次完整查詢，之後只抓取新經過的時間片段

use qcache::{
    prometheus_cache, DataFrame, Field, PromQuery, QueryCacheConfig, QueryRequest, RawTimeRange,
    TimeRange,
};

const MINUTE: i64 = 60_000;

/// 模擬後端：返回範圍內每分鐘一點
fn fake_backend(request: &QueryRequest<PromQuery>) -> Vec<DataFrame> {
    let from = request.range.from_ms() / MINUTE;
    let to = request.range.to_ms() / MINUTE;

    request
        .targets
        .iter()
        .map(|target| {
            DataFrame::new(
                target.ref_id.clone(),
                vec![
                    Field::time("Time", (from..=to).map(|m| m * MINUTE)),
                    Field::number("Value", (from..=to).map(|m| (m % 7) as f64)),
                ],
            )
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== 增量查詢快取示例 ===\n");

    let config = QueryCacheConfig::new().with_overlap_window("2m");
    let mut cache = prometheus_cache(&config);
    let targets = vec![PromQuery::new("A", "sum(rate(http_requests_total[5m]))")];

    // 6 小時視窗，每分鐘刷新一次
    for tick in 0..5i64 {
        let to = 360 * MINUTE + tick * MINUTE;
        let from = to - 360 * MINUTE;
        let range = TimeRange::from_millis(from, to)
            .ok_or_else(|| anyhow::anyhow!("時間範圍超出可表示範圍"))?;

        let request = QueryRequest::new("demo", 1, range, targets.clone())
            .with_raw_range(RawTimeRange::new("now-6h", "now"))
            .with_interval("1m", MINUTE);

        let info = cache.request_info(&request);
        let response = fake_backend(&info.request);
        let fetched: usize = response.iter().map(DataFrame::len).sum();

        let frames = cache.proc_frames(&request, &info, response)?;
        let total: usize = frames.iter().map(DataFrame::len).sum();

        println!(
            "刷新 {}: 請求 [{}m, {}m]，抓取 {} 點，返回 {} 點",
            tick,
            info.request.range.from_ms() / MINUTE,
            info.request.range.to_ms() / MINUTE,
            fetched,
            total
        );
    }

    let stats = cache.stats();
    println!(
        "\n部分查詢 {}/{}，快取 {} 列",
        stats.partial_queries, stats.requests, stats.cached_rows
    );

    Ok(())
}

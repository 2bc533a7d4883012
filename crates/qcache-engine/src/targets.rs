//! 內建查詢目標與簽名函數
//!
//! 不同查詢語言對「哪些變化會使快取失效」的定義不同，由資料來源在建立快取時選用。

use qcache_core::{QueryRequest, QueryTarget, TargetSig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prometheus 查詢目標
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromQuery {
    /// 參考 ID
    pub ref_id: String,

    /// PromQL 表達式
    pub expr: String,

    /// 最小步長（如 "30s"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// 是否查詢 exemplar
    #[serde(default)]
    pub exemplar: bool,

    /// 圖例格式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
}

impl PromQuery {
    pub fn new(ref_id: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            expr: expr.into(),
            interval: None,
            exemplar: false,
            legend_format: None,
        }
    }

    /// 建構器模式：設置最小步長
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// 建構器模式：設置 exemplar
    pub fn with_exemplar(mut self, exemplar: bool) -> Self {
        self.exemplar = exemplar;
        self
    }
}

impl QueryTarget for PromQuery {
    fn ref_id(&self) -> &str {
        &self.ref_id
    }
}

/// InfluxDB 查詢目標
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluxQuery {
    /// 參考 ID
    pub ref_id: String,

    /// InfluxQL 原始查詢
    #[serde(default)]
    pub query: String,

    /// 是否為手寫原始查詢
    #[serde(default)]
    pub raw_query: bool,

    /// 量測名稱（查詢建構器模式）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
}

impl InfluxQuery {
    pub fn new(ref_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query: query.into(),
            raw_query: true,
            measurement: None,
        }
    }
}

impl QueryTarget for InfluxQuery {
    fn ref_id(&self) -> &str {
        &self.ref_id
    }
}

/// 以模板變數值替換 `$name` 與 `${name}`
///
/// 較長的變數名稱先替換，避免 `$job` 吃掉 `$jobname` 的前綴
pub fn interpolate(text: &str, vars: &BTreeMap<String, String>) -> String {
    let mut names: Vec<&String> = vars.keys().collect();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));

    let mut out = text.to_string();
    for name in names {
        let value = &vars[name];
        out = out
            .replace(&format!("${{{}}}", name), value)
            .replace(&format!("${}", name), value);
    }
    out
}

fn raw_range_sig<Q>(request: &QueryRequest<Q>) -> String {
    serde_json::to_string(&request.range_raw).unwrap_or_default()
}

/// Prometheus 目標簽名：展開後的表達式 + 間隔 + 原始時間範圍 + exemplar
pub fn prom_target_signature(request: &QueryRequest<PromQuery>, target: &PromQuery) -> TargetSig {
    format!(
        "{}|{}|{}|{}|{}",
        interpolate(&target.expr, &request.scoped_vars),
        request.interval_ms,
        target.interval.as_deref().unwrap_or_default(),
        raw_range_sig(request),
        target.exemplar
    )
}

/// InfluxDB 目標簽名：展開後的查詢 + 間隔 + 原始時間範圍
pub fn influx_target_signature(
    request: &QueryRequest<InfluxQuery>,
    target: &InfluxQuery,
) -> TargetSig {
    let query = if target.raw_query {
        interpolate(&target.query, &request.scoped_vars)
    } else {
        // 建構器模式：以量測名稱與變數值作為查詢內容
        format!(
            "{}|{}",
            target.measurement.as_deref().unwrap_or_default(),
            serde_json::to_string(&request.scoped_vars).unwrap_or_default()
        )
    };

    format!("{}|{}|{}", query, request.interval_ms, raw_range_sig(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcache_core::{RawTimeRange, TimeRange};
    use rstest::rstest;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn prom_request(expr: &str) -> QueryRequest<PromQuery> {
        QueryRequest::new(
            "dash",
            2,
            TimeRange::from_millis(0, 3_600_000).unwrap(),
            vec![PromQuery::new("A", expr)],
        )
        .with_raw_range(RawTimeRange::new("now-1h", "now"))
        .with_interval("15s", 15_000)
    }

    #[rstest]
    #[case("up{job=\"$job\"}", "up{job=\"api\"}")]
    #[case("up{job=\"${job}\"}", "up{job=\"api\"}")]
    #[case("$jobname", "billing")]
    #[case("no vars", "no vars")]
    fn test_interpolate(#[case] text: &str, #[case] expected: &str) {
        let vars = vars(&[("job", "api"), ("jobname", "billing")]);
        assert_eq!(interpolate(text, &vars), expected);
    }

    #[test]
    fn test_prom_signature_stable() {
        let req = prom_request("up");
        let a = prom_target_signature(&req, &req.targets[0]);
        let b = prom_target_signature(&req, &req.targets[0]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_prom_signature_ignores_absolute_range() {
        let req = prom_request("up");
        let mut moved = req.clone();
        moved.range = TimeRange::from_millis(60_000, 3_660_000).unwrap();

        assert_eq!(
            prom_target_signature(&req, &req.targets[0]),
            prom_target_signature(&moved, &moved.targets[0])
        );
    }

    #[test]
    fn test_prom_signature_changes() {
        let req = prom_request("up{job=\"$job\"}").with_scoped_var("job", "api");
        let base = prom_target_signature(&req, &req.targets[0]);

        let var_changed = req.clone().with_scoped_var("job", "db");
        assert_ne!(base, prom_target_signature(&var_changed, &var_changed.targets[0]));

        let interval_changed = req.clone().with_interval("30s", 30_000);
        assert_ne!(
            base,
            prom_target_signature(&interval_changed, &interval_changed.targets[0])
        );

        let raw_changed = req.clone().with_raw_range(RawTimeRange::new("now-6h", "now"));
        assert_ne!(base, prom_target_signature(&raw_changed, &raw_changed.targets[0]));

        let exemplar = req.targets[0].clone().with_exemplar(true);
        assert_ne!(base, prom_target_signature(&req, &exemplar));

        let step = req.targets[0].clone().with_interval("1m");
        assert_ne!(base, prom_target_signature(&req, &step));
    }

    #[test]
    fn test_influx_signature() {
        let req = QueryRequest::new(
            "dash",
            2,
            TimeRange::from_millis(0, 10).unwrap(),
            vec![InfluxQuery::new("A", "SELECT mean(v) FROM cpu WHERE host = '$host'")],
        )
        .with_raw_range(RawTimeRange::new("now-1h", "now"))
        .with_scoped_var("host", "web-1");

        let sig = influx_target_signature(&req, &req.targets[0]);
        assert!(sig.starts_with("SELECT mean(v) FROM cpu WHERE host = 'web-1'|"));

        let mut builder = InfluxQuery::new("B", "");
        builder.raw_query = false;
        builder.measurement = Some("cpu".to_string());

        let a = influx_target_signature(&req, &builder);
        let b = influx_target_signature(&req.clone().with_scoped_var("host", "web-2"), &builder);
        assert_ne!(a, b);
    }
}

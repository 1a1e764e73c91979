use crate::adapters::html::escape_html;
use crate::domain::model::{ChartSettings, ValueFormat};

const LARGE_UNITS: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// 規模數值的文字格式，只用於標籤與 tooltip，不影響透明度或佈局
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormatter {
    mode: ValueFormat,
    currency_symbol: String,
    scale_label: String,
    total: f64,
}

impl ValueFormatter {
    pub fn new(mode: ValueFormat) -> Self {
        Self {
            mode,
            currency_symbol: "$".to_string(),
            scale_label: "Scale".to_string(),
            total: 0.0,
        }
    }

    pub fn from_settings(settings: &ChartSettings) -> Self {
        Self {
            mode: settings.format,
            currency_symbol: settings.currency_symbol.clone(),
            scale_label: settings.scale_label.clone(),
            total: 0.0,
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// 百分比模式的分母
    pub fn with_total(mut self, total: f64) -> Self {
        self.total = total;
        self
    }

    pub fn mode(&self) -> ValueFormat {
        self.mode
    }

    pub fn format(&self, value: f64) -> String {
        match self.mode {
            ValueFormat::Plain => format_plain(value),
            ValueFormat::Large => format_large(value),
            ValueFormat::Percent => format_percent(value, self.total),
            ValueFormat::Currency => format_currency(value, &self.currency_symbol),
        }
    }

    /// tooltip 文字：第一行名稱，第二行格式化後的規模，內容皆經 HTML 跳脫
    pub fn summary(&self, name: &str, value: f64) -> String {
        format!(
            "{}<br/>{}: {}",
            escape_html(name),
            escape_html(&self.scale_label),
            escape_html(&self.format(value))
        )
    }
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_plain(value: f64) -> String {
    trim_decimals(value, 2)
}

pub fn format_large(value: f64) -> String {
    let abs = value.abs();
    let position = LARGE_UNITS
        .iter()
        .position(|(threshold, _)| abs >= *threshold);

    // 四捨五入後進位到 1000 時改用上一級單位，999_950 顯示為 1M 而不是 1000K
    let index = match position {
        Some(i) if i > 0 && (abs / LARGE_UNITS[i].0 * 10.0).round() >= 10_000.0 => i - 1,
        Some(i) => i,
        None if (abs * 100.0).round() >= 100_000.0 => LARGE_UNITS.len() - 1,
        None => return format_plain(value),
    };

    let (threshold, unit) = LARGE_UNITS[index];
    format!("{}{}", trim_decimals(value / threshold, 1), unit)
}

pub fn format_percent(value: f64, total: f64) -> String {
    if total == 0.0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", value / total * 100.0)
}

pub fn format_currency(value: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", sign, symbol, group_thousands(integer), fraction)
}

//! Built-in profile for Russian IFRS/RAS financial reports.

use super::ProfileConfig;

/// Unit statements such as "тыс. руб." or "в миллионах российских рублей".
const CURRENCY_TEMPLATE: &str =
    r"(?i)(?:тыс\.?|млн\.?|млрд\.?|тысячах|миллионах|миллиардах)\s*(?:российских\s+)?{}";

const MEASURE_TEMPLATES: [&str; 2] = [
    r"(?i){}\s*(?:российских\s+)?(?:руб|долл|евро)",
    r"(?i)\(\s*в\s+{}",
];

/// A report row: label, optional colon, then numeric columns only.
fn row(label: &str) -> String {
    format!(r"(?m)^[ \t]*(?:{})[ \t:]*[\d \t\u{{00a0}},.()\-]+\r?$", label)
}

pub(super) fn report_profile() -> ProfileConfig {
    ProfileConfig::new()
        .keyword_field(
            "currency",
            [
                ("долларов", "USD"),
                ("рублей", "RUB"),
                ("руб", "RUB"),
                ("евро", "EUR"),
            ],
            [CURRENCY_TEMPLATE],
        )
        .keyword_field(
            "measure",
            [
                ("тыс.", "1000"),
                ("тысячах", "1000"),
                ("млн", "1000000"),
                ("млн.", "1000000"),
                ("миллионах", "1000000"),
                ("млрд", "1000000000"),
                ("млрд.", "1000000000"),
                ("миллиардах", "1000000000"),
            ],
            MEASURE_TEMPLATES,
        )
        .pattern_field(
            "cash",
            [row(r"Денежные средства и (?:их )?эквиваленты(?: денежных средств)?")],
        )
        .pattern_field("equity", [row(r"Итого капитал(?:а)?")])
        .pattern_field("liabilities", [row(r"Итого обязательства")])
        .pattern_field(
            "equity_liabilities",
            [
                row(r"Итого капитал и обязательства"),
                row(r"Итого обязательства и капитал"),
                row(r"Итого активы"),
            ],
        )
        .pattern_field("sales", [row(r"Выручка(?: от реализации)?")])
        .pattern_field(
            "interest_income",
            [row(r"Процентные доходы"), row(r"Финансовые доходы")],
        )
        .pattern_field(
            "interest_expense",
            [row(r"Процентные расходы"), row(r"Финансовые расходы")],
        )
        .pattern_field("profit_before_tax", [row(r"Прибыль до налогообложения")])
        .pattern_field(
            "clean_profit",
            [row(r"Чистая прибыль(?: за (?:год|период))?"), row(r"Прибыль за (?:год|период)")],
        )
        .pattern_field(
            "amortization",
            [row(r"Амортизация(?: основных средств)?"), row(r"Износ и амортизация")],
        )
        // Market capitalization is never printed in the report itself.
        .pattern_field("capitalization", Vec::<String>::new())
}

use dhub_domain::{DonationCategory, DonationSummary};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, format_percent, format_timestamp, share_bar};
use crate::cli::output;
use crate::cli::receipt::{render_receipt, share_text, ReceiptStyle};
use crate::cli::table::{Table, TableColumn};

const BAR_WIDTH: usize = 20;
const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "Show donations, most recent first",
            "list",
            cmd_list,
        ),
        CommandDefinition::new(
            "summary",
            "Totals by category and region",
            "summary [--json]",
            cmd_summary,
        ),
        CommandDefinition::new(
            "receipt",
            "Print the receipt and share text for a donation",
            "receipt <id|receipt>",
            cmd_receipt,
        ),
        CommandDefinition::new(
            "insight",
            "Describe the current donations in plain language",
            "insight",
            cmd_insight,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let records = context.session().ledger().snapshot()?;
    if records.is_empty() {
        output::info("No donations recorded yet. Use `add` to record one.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("Receipt"),
        TableColumn::left("Date"),
        TableColumn::left("Donor").max(24),
        TableColumn::left("Category"),
        TableColumn::left("Region"),
        TableColumn::right("Amount"),
        TableColumn::left("Id"),
    ]);
    for record in &records {
        let mut short_id = record.id.simple().to_string();
        short_id.truncate(SHORT_ID_LEN);
        table.push_row(vec![
            record.receipt_number.to_string(),
            format_timestamp(&record.timestamp),
            record.donor_name.clone(),
            record.category.label().to_string(),
            record.region.label().to_string(),
            format_amount(record.amount, context.currency()),
            short_id,
        ]);
    }

    output::section(format!("Donations ({})", records.len()));
    output::block(table.render());
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let summary = context.session().ledger().aggregate()?;
    match args {
        [] => {}
        [flag] if flag.eq_ignore_ascii_case("--json") => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|err| CommandError::Message(err.to_string()))?;
            output::block(json);
            return Ok(());
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: summary [--json]".into(),
            ))
        }
    }
    let currency = context.currency();

    output::section("Summary");
    output::info(format!("Total collected : {}", format_amount(summary.total, currency)));
    output::info(format!("Receipts issued : {}", summary.count));
    output::info(format!(
        "Zakat collected : {}",
        format_amount(summary.category_total(DonationCategory::Zakat), currency)
    ));
    if summary.count == 0 {
        return Ok(());
    }

    let categories = summary
        .category_series()
        .into_iter()
        .map(|(category, amount)| (category.label().to_string(), amount))
        .collect();
    output::section("By category");
    output::block(breakdown_table("Category", categories, &summary, currency));

    let regions = summary
        .region_series()
        .into_iter()
        .map(|(region, amount)| (region.label().to_string(), amount))
        .collect();
    output::section("By region");
    output::block(breakdown_table("Region", regions, &summary, currency));
    Ok(())
}

fn breakdown_table(
    heading: &str,
    series: Vec<(String, f64)>,
    summary: &DonationSummary,
    currency: &str,
) -> String {
    let mut table = Table::new(vec![
        TableColumn::left(heading),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
        TableColumn::left(""),
    ]);
    for (label, amount) in series {
        let percent = summary.share_of_total(amount).unwrap_or(0.0);
        table.push_row(vec![
            label,
            format_amount(amount, currency),
            format_percent(percent),
            share_bar(percent / 100.0, BAR_WIDTH),
        ]);
    }
    table.render()
}

fn cmd_receipt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: receipt <id|receipt>".into(),
        ));
    };
    let record = context.resolve_record(key)?;
    let config = context.session().config();
    let style = ReceiptStyle {
        currency: &config.currency_label,
        bilingual: config.bilingual_labels,
    };

    output::block(render_receipt(&record, &style));
    output::section("Share text");
    output::info(share_text(&record, &config.currency_label));
    Ok(())
}

fn cmd_insight(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.session().insight()?;
    output::section("Insight");
    if outcome.is_fallback() {
        output::warning(outcome.text);
    } else {
        output::info(outcome.text);
    }
    Ok(())
}

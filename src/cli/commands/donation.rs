use dhub_domain::{DonationCategory, DonationDraft, RecordChanges, Region};

use crate::cli::commands::{split_flags, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_amount;
use crate::cli::output;
use crate::errors::HubError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record a donation and issue its receipt number",
            "add <donor> <amount> [category] [region] [notes...]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Change donor, amount, category, region or notes of a donation",
            "edit <id|receipt> [--donor NAME] [--amount N] [--category C] [--region R] [--notes TEXT | --clear-notes]",
            cmd_edit,
        ),
        CommandDefinition::new(
            "delete",
            "Remove a donation (its receipt number is never reused)",
            "delete <id|receipt>",
            cmd_delete,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [donor, amount, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: add <donor> <amount> [category] [region] [notes...]".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let config = context.session().config();
    let category = match rest.first() {
        Some(raw) => parse_category(raw)?,
        None => config.default_category,
    };
    let region = match rest.get(1) {
        Some(raw) => parse_region(raw)?,
        None => config.default_region,
    };

    let mut draft = DonationDraft::new(*donor, amount, category, region);
    if rest.len() > 2 {
        draft = draft.with_notes(rest[2..].join(" "));
    }

    let record = context.session().ledger().insert(draft)?;
    output::success(format!(
        "Recorded {} from {} as receipt {}",
        format_amount(record.amount, context.currency()),
        record.donor_name,
        record.receipt_number
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = split_flags(
        args,
        &["donor", "amount", "category", "region", "notes"],
        &["clear-notes"],
    )
    .map_err(CommandError::InvalidArguments)?;
    let [key] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id|receipt> [--donor NAME] [--amount N] [--category C] [--region R] [--notes TEXT | --clear-notes]".into(),
        ));
    };
    if flags.contains_key("notes") && flags.contains_key("clear-notes") {
        return Err(CommandError::InvalidArguments(
            "use either --notes or --clear-notes, not both".into(),
        ));
    }

    let value = |name: &str| flags.get(name).copied().flatten();
    let changes = RecordChanges {
        donor_name: value("donor").map(str::to_string),
        amount: value("amount").map(parse_amount).transpose()?,
        category: value("category").map(parse_category).transpose()?,
        region: value("region").map(parse_region).transpose()?,
        notes: if flags.contains_key("clear-notes") {
            Some(None)
        } else {
            value("notes").map(|text| Some(text.to_string()))
        },
    };
    if changes.is_empty() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass at least one flag".into(),
        ));
    }

    let target = context.resolve_record(key)?;
    let updated = context.session().ledger().update(target.id, changes)?;
    output::success(format!(
        "Updated receipt {} ({}, {})",
        updated.receipt_number,
        updated.donor_name,
        format_amount(updated.amount, context.currency())
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: delete <id|receipt>".into(),
        ));
    };
    let target = match context.resolve_record(key) {
        Ok(record) => record,
        Err(CommandError::Hub(HubError::NotFound(_))) => {
            output::warning(format!("No donation matches `{key}`; nothing was deleted."));
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    match context.session().ledger().delete(target.id)? {
        Some(removed) => output::success(format!(
            "Deleted receipt {} ({})",
            removed.receipt_number, removed.donor_name
        )),
        None => output::warning(format!("Receipt {} was already removed.", target.receipt_number)),
    }
    Ok(())
}

/// Accepts `5000`, `5,000` and `5000.50`; range checks happen in the ledger.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

fn parse_category(raw: &str) -> Result<DonationCategory, CommandError> {
    raw.parse().map_err(|err| {
        CommandError::InvalidArguments(format!(
            "{err}. Expected one of: {}",
            DonationCategory::ALL.map(|c| c.label()).join(", ")
        ))
    })
}

fn parse_region(raw: &str) -> Result<Region, CommandError> {
    raw.parse().map_err(|err| {
        CommandError::InvalidArguments(format!(
            "{err}. Expected one of: {}",
            Region::ALL.map(|r| r.label()).join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_grouping() {
        assert_eq!(parse_amount("5,000").unwrap(), 5000.0);
        assert_eq!(parse_amount("12.5").unwrap(), 12.5);
        assert!(matches!(
            parse_amount("five"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn labels_and_codes_parse() {
        assert_eq!(parse_category("zakat").unwrap(), DonationCategory::Zakat);
        assert_eq!(parse_region("5N").unwrap(), Region::Area5No);
        assert_eq!(parse_region("J Area").unwrap(), Region::JArea);
        assert!(parse_region("Lahore").is_err());
    }
}

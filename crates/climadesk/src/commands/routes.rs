//! Route table handlers. Local only; no backend calls.

use serde::Serialize;
use tabled::Tabled;

use climadesk_core::{NavParams, Resolution, RouteTable, Target, View};

use crate::cli::{GlobalOpts, RoutesArgs, RoutesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Clone, Serialize, Tabled)]
struct RouteRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Title")]
    title: String,
}

fn rows(table: &RouteTable) -> Vec<RouteRow> {
    table
        .routes()
        .iter()
        .map(|r| match &r.target {
            Target::View(view) => RouteRow {
                path: r.pattern.to_string(),
                target: view.to_string(),
                title: view.label().into(),
            },
            Target::Redirect(to) => RouteRow {
                path: r.pattern.to_string(),
                target: format!("-> {to}"),
                title: String::new(),
            },
        })
        .collect()
}

fn resolution_detail(r: &Resolution) -> String {
    let mut pairs = vec![
        ("View", r.view.to_string()),
        ("Title", r.view.label().to_owned()),
        ("Path", r.path.clone()),
    ];
    if let Some(ref room) = r.params.room {
        pairs.push(("Room", room.to_string()));
    }
    if let Some(ref from) = r.redirected_from {
        pairs.push(("Redirected from", from.clone()));
    }
    output::detail_block(&pairs)
}

fn parse_view(raw: &str) -> Result<View, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "view".into(),
        reason: format!(
            "unknown view '{raw}'. Known views: {}",
            View::ALL.map(|v| v.to_string()).join(", ")
        ),
    })
}

pub fn handle(args: RoutesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let table = RouteTable::standard();

    match args.command {
        RoutesCommand::List => {
            let out = output::render_list(&global.output, &rows(&table), RouteRow::clone, |r| {
                r.path.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Resolve { location } => {
            let resolution = table.resolve(&location)?;
            let out = output::render_single(&global.output, &resolution, resolution_detail, |r| {
                r.path.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Href { view, room } => {
            let view = parse_view(&view)?;
            let params = match room {
                Some(raw) => NavParams::room(util::parse_room(&raw)?),
                None => NavParams::default(),
            };
            let href = table.href(view, &params)?;
            output::print_output(&href, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_includes_redirect_and_room_route() {
        let listed = rows(&RouteTable::standard());
        assert!(listed.iter().any(|r| r.path == "/" && r.target == "-> /overview"));
        assert!(listed.iter().any(|r| r.path == "/aircon/:roomNumber" && r.target == "ac-panel"));
    }

    #[test]
    fn view_names_are_kebab_case() {
        assert_eq!(parse_view("front-desk").ok(), Some(View::FrontDesk));
        assert!(parse_view("lobby").is_err());
    }
}

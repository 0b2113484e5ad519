//
//  fryends-client
//  cli/skillr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Skillr listing commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use crate::api::Endpoint;

use super::GlobalOptions;

/// Browse skillrs
#[derive(Args, Debug)]
pub struct SkillrCommand {
    #[command(subcommand)]
    pub command: SkillrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SkillrSubcommand {
    /// List skillrs
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list your favourites (requires login)
    #[arg(long)]
    pub favourites: bool,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long, short = 'L')]
    pub limit: Option<u32>,

    /// Raw, already encoded query string appended to the path
    #[arg(long, conflicts_with_all = ["favourites", "page", "limit"])]
    pub query: Option<String>,
}

impl ListArgs {
    /// Builds the query fragment, including the leading `?`.
    fn query_fragment(&self) -> Option<String> {
        if let Some(raw) = &self.query {
            let raw = raw.trim_start_matches('?');
            return (!raw.is_empty()).then(|| format!("?{raw}"));
        }

        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={limit}"));
        }
        if self.favourites {
            pairs.push("isFavourite=true".to_string());
        }

        (!pairs.is_empty()).then(|| format!("?{}", pairs.join("&")))
    }
}

impl SkillrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            SkillrSubcommand::List(args) => list(args, global).await,
        }
    }
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let client = global.client()?;
    let endpoint = Endpoint::RetrieveSkillrList {
        query: args.query_fragment(),
    };

    if endpoint.requires_bearer() && !client.auth().is_logged_in() {
        anyhow::bail!(crate::api::ApiError::Auth(
            "Favourites require a login; run 'fryends auth login'".to_string()
        ));
    }

    let response: Value = client
        .call_with_refresh(&endpoint, None, None)
        .await
        .context("Failed to list skillrs")?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let items = skillr_items(&response);
    if items.is_empty() {
        println!("No skillrs found");
        return Ok(());
    }

    println!(
        "{}",
        style(format!("{:<28} {}", "ID", "NAME")).bold()
    );
    for item in items {
        println!("{:<28} {}", field(item, &["_id", "id"]), field(item, &["name", "username"]));
    }

    Ok(())
}

/// Finds the list of skillrs in a response body.
///
/// Accepts a bare array or an object wrapping one under a common key.
fn skillr_items(response: &Value) -> &[Value] {
    if let Some(items) = response.as_array() {
        return items;
    }
    ["skillrs", "data", "results", "items"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn field(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| item.get(*key))
        .map(crate::api::param_to_string)
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(favourites: bool, page: Option<u32>, limit: Option<u32>, query: Option<&str>) -> ListArgs {
        ListArgs {
            favourites,
            page,
            limit,
            query: query.map(String::from),
        }
    }

    #[test]
    fn test_query_fragment() {
        assert_eq!(args(false, None, None, None).query_fragment(), None);
        assert_eq!(
            args(true, Some(2), Some(50), None).query_fragment().as_deref(),
            Some("?page=2&limit=50&isFavourite=true")
        );
        assert_eq!(
            args(false, None, None, Some("sort=new")).query_fragment().as_deref(),
            Some("?sort=new")
        );
        assert_eq!(args(false, None, None, Some("?")).query_fragment(), None);
    }

    #[test]
    fn test_favourites_need_bearer() {
        let endpoint = Endpoint::RetrieveSkillrList {
            query: args(true, None, None, None).query_fragment(),
        };
        assert!(endpoint.requires_bearer());
    }

    #[test]
    fn test_skillr_items() {
        let bare = json!([{"id": 1}]);
        assert_eq!(skillr_items(&bare).len(), 1);

        let wrapped = json!({"skillrs": [{"_id": "a", "name": "Ada"}, {"_id": "b"}]});
        let items = skillr_items(&wrapped);
        assert_eq!(items.len(), 2);
        assert_eq!(field(&items[0], &["_id", "id"]), "a");
        assert_eq!(field(&items[1], &["name"]), "-");

        assert!(skillr_items(&json!({"count": 0})).is_empty());
    }
}

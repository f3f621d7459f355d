// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn currency_arg() -> Arg {
    Arg::new("currency")
        .long("currency")
        .short('c')
        .default_value("USD")
        .help("Currency code: USD, GBP, EURO or ILS")
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .short('y')
        .value_parser(value_parser!(i32))
        .help("Year, defaults to the current year")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .short('m')
        .value_parser(value_parser!(u32))
        .help("Month 1-12, defaults to the current month")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

pub fn build_cli() -> Command {
    Command::new("costbook")
        .about("Personal expense ledger with multi-currency reports")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("add")
                .about("Record a cost dated today")
                .arg(
                    Arg::new("sum")
                        .long("sum")
                        .short('s')
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(currency_arg())
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("description").long("description").short('d')),
        )
        .subcommand(
            Command::new("report")
                .about("List a month's costs with a converted total")
                .arg(year_arg())
                .arg(month_arg())
                .arg(currency_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("chart")
                .about("Aggregated totals")
                .subcommand(
                    Command::new("categories")
                        .about("Totals per category for a month")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(currency_arg())
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("months")
                        .about("Totals per month for a year")
                        .arg(year_arg())
                        .arg(currency_arg())
                        .arg(json_arg()),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Exchange rate source")
                .subcommand(Command::new("show").about("Show the configured rates URL"))
                .subcommand(
                    Command::new("set-url")
                        .about("Save the rates URL")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("test")
                        .about("Fetch rates now and report any failure")
                        .arg(Arg::new("url").long("url")),
                ),
        )
}

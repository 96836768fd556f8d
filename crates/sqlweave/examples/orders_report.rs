//! Orders Report - Multi-Dialect Example
//!
//! This example builds the queries behind a small order-reporting screen
//! and prints them for every built-in dialect:
//! - A paged order listing with optional filters, and its totals
//! - A per-customer revenue summary
//! - Restocking with an upsert
//! - Archiving old orders
//!
//! Run with: cargo run --example orders_report -- --dialect mysql --verbose
//!
//! `--dialect` takes a profile or engine name (`sqlite`, `mysql`,
//! `postgres`, ...); without it every profile is printed. Render logs go to
//! stderr.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sqlweave::builder::{
    col, count_all, delete_from, insert_into, select, sum, table, update, SqlValue,
};
use sqlweave::{DialectKind, Result, SelectStatement, Statement};

/// Prints the SQL behind the orders report.
#[derive(Parser)]
#[command(name = "orders-report")]
#[command(about, long_about = None)]
struct Cli {
    /// Dialect profile or engine name (all profiles if not specified).
    #[arg(short, long, env = "SQLWEAVE_DIALECT")]
    dialect: Option<DialectKind>,

    /// Reporting year.
    #[arg(short, long, default_value_t = 2024)]
    year: i64,

    /// Log every render at debug level.
    #[arg(short, long)]
    verbose: bool,
}

// =============================================================================
// QUERIES
// =============================================================================

fn order_listing(customer: Option<&str>, min_total: Option<f64>, page: u64) -> Result<SelectStatement> {
    const PAGE_SIZE: u64 = 25;
    select(["o.id", "o.placed_at", "o.total", "c.name"])
        .from_as("orders", "o")
        .join(table("customers").alias("c"), col("c.id").eq(col("o.customer_id")))
        .where_clause(col("o.status").ne("cancelled"))
        .where_opt(customer.map(|name| col("c.name").contains(name)))
        .where_opt(min_total.map(|total| col("o.total").gt_eq(total)))
        .order_by_desc(&["o.placed_at"])
        .limit(PAGE_SIZE)
        .offset(page.saturating_mul(PAGE_SIZE))
        .build()
}

/// Totals shown under the listing, over every page.
fn listing_totals(listing: &SelectStatement) -> Result<SelectStatement> {
    listing.summary([
        count_all().alias("orders"),
        sum(col("o.total")).alias("revenue"),
    ])
}

fn revenue_by_customer(year: i64) -> Result<Statement> {
    let query = select(["c.name"])
        .column_as(count_all(), "orders")
        .column_as(sum(col("o.total")), "revenue")
        .from_as("customers", "c")
        .left_join(table("orders").alias("o"), col("o.customer_id").eq(col("c.id")))
        .where_clause(col("o.year").eq(year))
        .group_by(&["c.name"])
        .having(sum(col("o.total")).gt(1000))
        .order_by_desc(&["revenue"])
        .build()?;
    Ok(query.into())
}

fn restock(items: &[(&str, i64)]) -> Result<Statement> {
    let mut rows = items.iter();
    let Some((sku, qty)) = rows.next() else {
        return Err(sqlweave::Error::MalformedStatement(String::from(
            "nothing to restock",
        )));
    };
    let insert = insert_into("inventory")
        .columns(&["sku", "qty"])
        .values([SqlValue::Text(String::from(*sku)), SqlValue::Int(*qty)]);
    let statement = rows
        .fold(insert, |insert, (sku, qty)| {
            insert.values([SqlValue::Text(String::from(*sku)), SqlValue::Int(*qty)])
        })
        .on_conflict_do_update(&["sku"], &["qty"])
        .build()?;
    Ok(statement.into())
}

fn archive_before(year: i64) -> Result<Vec<Statement>> {
    let flag = update("orders")
        .set("archived", true)
        .where_clause(col("year").lt(year))
        .require_where()
        .build()?;
    let purge = delete_from("order_events")
        .where_clause(col("year").lt(year))
        .require_where()
        .build()?;
    Ok(vec![flag.into(), purge.into()])
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_sql(description: &str, statement: &Statement, kind: DialectKind) -> Result<()> {
    let rendered = statement.render(kind.profile())?;
    println!("-- {description}");
    println!("{};", rendered.sql());
    println!("-- params: {:?}", rendered.params());
    println!("-- inline: {}", rendered.to_inline_sql(kind.profile()));
    println!();
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let kinds = cli
        .dialect
        .map_or_else(|| DialectKind::ALL.to_vec(), |kind| vec![kind]);

    let large_orders = order_listing(None, Some(500.0), 0)?;
    let mut statements: Vec<(&str, Statement)> = vec![
        (
            "Second page of orders for customers named like 'ann'",
            order_listing(Some("ann"), None, 1)?.into(),
        ),
        ("Large orders, totals", listing_totals(&large_orders)?.into()),
        ("Large orders, first page", large_orders.into()),
        ("Revenue by customer", revenue_by_customer(cli.year)?),
        ("Restock", restock(&[("A-1", 40), ("B-7", 12)])?),
    ];
    for statement in archive_before(cli.year - 4)? {
        statements.push(("Archive old orders", statement));
    }

    for kind in kinds {
        println!("-- =============================================================================");
        println!("-- {kind}");
        println!("-- =============================================================================");
        println!();
        for (description, statement) in &statements {
            print_sql(description, statement, kind)?;
        }
    }
    Ok(())
}

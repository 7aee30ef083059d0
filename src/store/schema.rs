// ============================================================================
// Relational Schema - Tables owned by the order service
// ============================================================================
//
// Explicit description of the `orders` and `orders_products` tables. The
// migrations under ./migrations create exactly this shape; the tests below
// keep the two in sync.
//
// ============================================================================

/// Referential action for a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: &'static str,
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    /// Constraint clause as written in the migrations
    pub fn constraint_sql(&self) -> String {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({})\n        REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            self.name,
            self.column,
            self.references_table,
            self.references_column,
            self.on_delete.as_sql(),
            self.on_update.as_sql(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column list in declaration order, e.g. for SELECT clauses
    pub fn column_list(&self) -> String {
        self.columns.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
    }
}

const fn column(
    name: &'static str,
    sql_type: &'static str,
    nullable: bool,
    default: Option<&'static str>,
) -> Column {
    Column { name, sql_type, nullable, default }
}

pub const ORDERS: Table = Table {
    name: "orders",
    columns: &[
        column("id", "uuid", false, Some("uuid_generate_v4()")),
        column("customer_id", "uuid", false, None),
        column("created_at", "timestamp", false, Some("now()")),
        column("updated_at", "timestamp", false, Some("now()")),
    ],
    foreign_keys: &[ForeignKey {
        name: "fk_customers_orders",
        column: "customer_id",
        references_table: "customers",
        references_column: "id",
        on_delete: ReferentialAction::Cascade,
        on_update: ReferentialAction::Cascade,
    }],
};

pub const ORDERS_PRODUCTS: Table = Table {
    name: "orders_products",
    columns: &[
        column("id", "uuid", false, Some("uuid_generate_v4()")),
        column("product_id", "uuid", false, None),
        column("order_id", "uuid", false, None),
        column("quantity", "integer", false, None),
        column("price", "decimal(18, 2)", false, None),
        column("created_at", "timestamp", false, Some("now()")),
        column("updated_at", "timestamp", false, Some("now()")),
    ],
    foreign_keys: &[
        ForeignKey {
            name: "fk_orders_products_order",
            column: "order_id",
            references_table: "orders",
            references_column: "id",
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::Cascade,
        },
        ForeignKey {
            name: "fk_orders_products_product",
            column: "product_id",
            references_table: "products",
            references_column: "id",
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::Cascade,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE_ORDERS: &str = include_str!("../../migrations/1590086642223_create_orders.up.sql");
    const CREATE_ORDERS_PRODUCTS: &str =
        include_str!("../../migrations/1590090687173_create_orders_products.up.sql");

    fn assert_matches_migration(table: &Table, sql: &str) {
        assert!(sql.contains(&format!("CREATE TABLE {} (", table.name)));
        for column in table.columns {
            let declaration = format!("{} {}", column.name, column.sql_type);
            let line = sql
                .lines()
                .map(str::trim)
                .find(|line| line.starts_with(&declaration))
                .unwrap_or_else(|| panic!("column {} missing from {} migration", column.name, table.name));

            let required = line.contains("NOT NULL") || line.contains("PRIMARY KEY");
            assert_eq!(required, !column.nullable, "nullability of {}.{} differs", table.name, column.name);

            if let Some(default) = column.default {
                assert!(line.contains(&format!("DEFAULT {default}")), "default of {}.{} differs", table.name, column.name);
            }
        }
        for fk in table.foreign_keys {
            assert!(sql.contains(&fk.constraint_sql()), "constraint {} differs", fk.name);
        }
    }

    #[test]
    fn test_orders_migration_matches_schema() {
        assert_matches_migration(&ORDERS, CREATE_ORDERS);
    }

    #[test]
    fn test_orders_products_migration_matches_schema() {
        assert_matches_migration(&ORDERS_PRODUCTS, CREATE_ORDERS_PRODUCTS);
    }

    #[test]
    fn test_all_foreign_keys_cascade() {
        for fk in ORDERS.foreign_keys.iter().chain(ORDERS_PRODUCTS.foreign_keys) {
            assert_eq!(fk.on_delete, ReferentialAction::Cascade, "{}", fk.name);
            assert_eq!(fk.on_update, ReferentialAction::Cascade, "{}", fk.name);
        }
    }

    #[test]
    fn test_line_item_price_and_quantity_are_required() {
        let price = ORDERS_PRODUCTS.column("price").unwrap();
        let quantity = ORDERS_PRODUCTS.column("quantity").unwrap();

        assert!(!price.nullable);
        assert_eq!(price.sql_type, "decimal(18, 2)");
        assert!(!quantity.nullable);
        assert_eq!(quantity.sql_type, "integer");
    }

    #[test]
    fn test_every_order_column_is_required() {
        for table in [&ORDERS, &ORDERS_PRODUCTS] {
            for column in table.columns {
                assert!(!column.nullable, "{}.{} is nullable", table.name, column.name);
            }
        }
    }

    #[test]
    fn test_column_list() {
        assert_eq!(ORDERS.column_list(), "id, customer_id, created_at, updated_at");
    }
}

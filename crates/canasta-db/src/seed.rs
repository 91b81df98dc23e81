use sqlx::PgPool;

use crate::DbError;

struct SeedProduct {
    name: &'static str,
    unit: Option<&'static str>,
    category: &'static str,
    prices: &'static [(&'static str, &'static str)],
}

struct SeedGroup {
    name: &'static str,
    slug: &'static str,
    compare_preference: Option<&'static str>,
    products: &'static [SeedProduct],
}

const SEED_GROUPS: &[SeedGroup] = &[
    SeedGroup {
        name: "Rice",
        slug: "rice",
        compare_preference: None,
        products: &[
            SeedProduct {
                name: "Arroz Blanco",
                unit: Some("900 g"),
                category: "pantry",
                prices: &[("mercado-uno", "10.00"), ("mercado-dos", "11.50")],
            },
            SeedProduct {
                name: "Arroz Premium",
                unit: Some("1 kg"),
                category: "pantry",
                prices: &[("mercado-uno", "12.00")],
            },
            SeedProduct {
                name: "Arroz Economico",
                unit: Some("2 lb"),
                category: "pantry",
                prices: &[("mercado-dos", "9.00")],
            },
        ],
    },
    SeedGroup {
        name: "Eggs",
        slug: "eggs",
        compare_preference: Some("count"),
        products: &[
            SeedProduct {
                name: "Huevos Grandes",
                unit: Some("12 unidades"),
                category: "dairy",
                prices: &[("mercado-uno", "4.80")],
            },
            SeedProduct {
                name: "Huevos Extra",
                unit: Some("paquete x30"),
                category: "dairy",
                prices: &[("mercado-dos", "10.50")],
            },
        ],
    },
    SeedGroup {
        name: "Olive Oil",
        slug: "olive-oil",
        compare_preference: None,
        products: &[
            SeedProduct {
                name: "Aceite de Oliva",
                unit: Some("500 ml"),
                category: "pantry",
                prices: &[("mercado-uno", "8.25")],
            },
            SeedProduct {
                name: "Aceite de Oliva Extra Virgen",
                unit: Some("1 lt"),
                category: "pantry",
                prices: &[("mercado-dos", "15.00")],
            },
            SeedProduct {
                name: "Aceite de Oliva Artesanal",
                unit: Some("botella mediana"),
                category: "pantry",
                prices: &[("mercado-uno", "6.00")],
            },
        ],
    },
];

/// Upsert a small demo catalog: three groups with products, memberships,
/// and price observations.
///
/// Returns the number of products processed. All upserts run inside a
/// single transaction; if any operation fails the entire batch is rolled
/// back. Re-running the seed is safe and does not duplicate rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for group in SEED_GROUPS {
        let group_id: i64 = sqlx::query_scalar(
            "INSERT INTO groups (name, slug, compare_preference) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 compare_preference = EXCLUDED.compare_preference, \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(group.name)
        .bind(group.slug)
        .bind(group.compare_preference)
        .fetch_one(&mut *tx)
        .await?;

        for product in group.products {
            // Product names are not unique in the schema, so the seed keys
            // on name explicitly to stay idempotent.
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT id FROM products WHERE name = $1")
                    .bind(product.name)
                    .fetch_optional(&mut *tx)
                    .await?;

            let product_id: i64 = match existing {
                Some(id) => {
                    sqlx::query(
                        "UPDATE products SET unit = $2, category = $3, updated_at = NOW() \
                         WHERE id = $1",
                    )
                    .bind(id)
                    .bind(product.unit)
                    .bind(product.category)
                    .execute(&mut *tx)
                    .await?;
                    id
                }
                None => {
                    sqlx::query_scalar(
                        "INSERT INTO products (name, unit, category) \
                         VALUES ($1, $2, $3) \
                         RETURNING id",
                    )
                    .bind(product.name)
                    .bind(product.unit)
                    .bind(product.category)
                    .fetch_one(&mut *tx)
                    .await?
                }
            };

            sqlx::query(
                "INSERT INTO group_products (group_id, product_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (group_id, product_id) DO NOTHING",
            )
            .bind(group_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

            for (retailer, price) in product.prices {
                sqlx::query(
                    "INSERT INTO prices (product_id, retailer, price) \
                     SELECT $1, $2, $3::numeric \
                     WHERE NOT EXISTS (\
                         SELECT 1 FROM prices \
                         WHERE product_id = $1 AND retailer = $2 AND is_active\
                     )",
                )
                .bind(product_id)
                .bind(retailer)
                .bind(price)
                .execute(&mut *tx)
                .await?;
            }

            count += 1;
        }
    }

    tx.commit().await?;
    Ok(count)
}

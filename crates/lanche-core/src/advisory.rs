//! # Advisory Prompts
//!
//! Builds the text prompts sent to the text-generation service, and the
//! fixed replies shown when that service is unavailable. The HTTP call
//! lives in the terminal app; nothing here does I/O.

use serde_json::json;

use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::{Sale, Supplier};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// How many recent sales the insight prompt includes.
pub const RECENT_SALES_WINDOW: usize = 10;

pub const MISSING_KEY_MESSAGE: &str = "Erro: Chave de API não configurada.";
pub const INSIGHT_EMPTY_MESSAGE: &str = "Não foi possível gerar uma análise no momento.";
pub const INSIGHT_FAILURE_MESSAGE: &str =
    "Erro ao conectar com o assistente IA. Verifique sua conexão ou chave de API.";
pub const RESTOCK_FAILURE_MESSAGE: &str = "Erro ao gerar sugestão.";

/// Executive-summary prompt over low stock, revenue and the latest sales.
pub fn insight_prompt(catalog: &Catalog, sales: &[Sale]) -> String {
    let low_stock: Vec<String> = catalog
        .iter()
        .filter(|p| p.stock <= p.min_stock)
        .map(|p| format!("{} ({})", p.name, p.stock))
        .collect();
    let low_stock = if low_stock.is_empty() {
        "Nenhum".to_string()
    } else {
        low_stock.join(", ")
    };

    let revenue: Money = sales.iter().map(|s| s.total).sum();
    let recent = &sales[sales.len().saturating_sub(RECENT_SALES_WINDOW)..];
    let recent_json = json!(recent
        .iter()
        .map(|s| json!({
            "total": s.total.cents() as f64 / 100.0,
            "items": s.items.iter().map(|i| i.product_name.as_str()).collect::<Vec<_>>(),
        }))
        .collect::<Vec<_>>());

    format!(
        "Atue como um consultor sênior de negócios para uma lanchonete. \
Analise os dados abaixo e forneça um resumo executivo curto e estratégico (máximo 3 parágrafos).
Foque em:
1. Itens críticos que precisam de reposição (Estoque baixo).
2. Tendências de vendas recentes.
3. Sugestão de ação imediata (ex: promoção, compra, mudança de preço).

Dados Atuais:
- Itens com estoque baixo/crítico: {low_stock}
- Receita total acumulada: {revenue}
- Últimas {count} vendas: {recent_json}
",
        count = recent.len(),
    )
}

/// Purchase-order suggestion for the products bought from `supplier`.
///
/// Target level is `min_stock + 20%`.
pub fn restock_prompt(catalog: &Catalog, supplier: &Supplier) -> String {
    let products: Vec<_> = catalog
        .iter()
        .filter(|p| p.supplier_id.as_deref() == Some(supplier.id.as_str()))
        .map(|p| {
            json!({
                "name": p.name,
                "stock": p.stock,
                "minStock": p.min_stock,
                "cost": p.cost.cents() as f64 / 100.0,
            })
        })
        .collect();

    format!(
        "Crie uma sugestão de pedido de compra para o fornecedor \"{name}\".
Baseie-se nestes produtos que compramos dele e seus níveis atuais de estoque:
{products}

Retorne apenas uma lista formatada com os itens e quantidades sugeridas para atingir um nível seguro (minStock + 20%).
Se o estoque estiver bom, diga que não é necessário comprar nada.
",
        name = supplier.name,
        products = json!(products),
    )
}

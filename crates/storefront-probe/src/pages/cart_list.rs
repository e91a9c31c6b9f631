//! The line-item list shared by the cart and checkout overview pages.

use crate::locator::{Locator, Selector};
use crate::model::{parse_count, parse_money, CartLine, CartState, Product};
use crate::page_object::PageContext;
use crate::resolver::{self, CART_ROW_CLASS, ITEM_NAME_CLASS};
use crate::result::{ProbeError, ProbeResult};

const PRICE_CLASS: &str = "inventory_item_price";
const QUANTITY_CLASS: &str = "cart_quantity";

/// Locators of the line-item list
#[derive(Debug, Clone)]
pub struct CartListLocators {
    /// Every line
    pub rows: Locator,
    /// Name label of every line
    pub names: Locator,
    /// Price label of every line
    pub prices: Locator,
    /// Quantity cell of every line
    pub quantities: Locator,
}

impl CartListLocators {
    /// Build from the session context
    #[must_use]
    pub fn new(ctx: &PageContext<'_>) -> Self {
        let row = || Selector::class(CART_ROW_CLASS);
        Self {
            rows: ctx.element(row()),
            names: ctx.element(row().descendant(Selector::class(ITEM_NAME_CLASS))),
            prices: ctx.element(row().descendant(Selector::class(PRICE_CLASS))),
            quantities: ctx.element(row().descendant(Selector::class(QUANTITY_CLASS))),
        }
    }
}

/// Operations over the line-item list of the current page
#[derive(Debug, Clone, Copy)]
pub(crate) struct CartList<'p> {
    pub(crate) ctx: PageContext<'p>,
    pub(crate) locators: &'p CartListLocators,
}

impl CartList<'_> {
    pub(crate) async fn count(&self) -> ProbeResult<usize> {
        self.ctx.find(&self.locators.rows).count().await
    }

    pub(crate) async fn names(&self) -> ProbeResult<Vec<String>> {
        self.ctx.find(&self.locators.names).all_texts().await
    }

    pub(crate) async fn prices(&self) -> ProbeResult<Vec<String>> {
        self.ctx.find(&self.locators.prices).all_texts().await
    }

    pub(crate) async fn quantity(&self, name: &str) -> ProbeResult<u32> {
        let locator = self
            .ctx
            .element(resolver::item_field(CART_ROW_CLASS, name, QUANTITY_CLASS));
        parse_count(&self.ctx.find(&locator).text().await?)
    }

    pub(crate) async fn price(&self, name: &str) -> ProbeResult<String> {
        let locator = self
            .ctx
            .element(resolver::item_field(CART_ROW_CLASS, name, PRICE_CLASS));
        self.ctx.find(&locator).text().await
    }

    pub(crate) async fn contains(&self, name: &str) -> ProbeResult<bool> {
        let locator = self.ctx.element(resolver::item_row(CART_ROW_CLASS, name));
        self.ctx.find(&locator).is_visible().await
    }

    /// Lines rebuilt from one read each of names, prices and quantities
    pub(crate) async fn lines(&self) -> ProbeResult<Vec<CartLine>> {
        let names = self.names().await?;
        let prices = self.prices().await?;
        let quantities = self.ctx.find(&self.locators.quantities).all_texts().await?;
        if names.len() != prices.len() || names.len() != quantities.len() {
            return Err(ProbeError::driver(format!(
                "cart list is ragged: {} names, {} prices, {} quantities",
                names.len(),
                prices.len(),
                quantities.len()
            )));
        }
        names
            .iter()
            .zip(&prices)
            .zip(&quantities)
            .map(|((name, price), quantity)| -> ProbeResult<CartLine> {
                Ok(CartLine {
                    product: Product::new(name.trim(), parse_money(price)?),
                    quantity: parse_count(quantity)?,
                })
            })
            .collect()
    }

    pub(crate) async fn state(&self) -> ProbeResult<CartState> {
        CartState::from_lines(self.lines().await?)
    }
}

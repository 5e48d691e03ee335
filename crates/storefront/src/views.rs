//! View models projected from the cart and catalog.
//!
//! Every view is rebuilt from scratch on each render; nothing here is
//! retained between requests. Interactive controls are plain data: a
//! [`ControlView`] names the [`CartAction`] an element triggers and the id it
//! carries, so rendering the same view twice yields the same single control
//! per element rather than stacking handlers.

use std::borrow::Cow;

use shopfront_core::{Cart, CartAction, CartLine, Catalog, CategoryFilter, Product, ProductId};

/// Longest product title shown on a card before truncation.
pub const TITLE_PREVIEW_CHARS: usize = 15;

/// Longest product description shown on a card before truncation.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Cut `text` to `max_chars` characters, appending `...` when anything was cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..byte_index])),
        None => Cow::Borrowed(text),
    }
}

// =============================================================================
// Controls
// =============================================================================

/// An interactive element bound to one cart action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    /// Route the element posts to.
    pub endpoint: &'static str,
    /// DOM id, unique per action kind and product.
    pub element_id: String,
    /// Id posted with the action.
    pub product_id: ProductId,
}

impl From<CartAction> for ControlView {
    fn from(action: CartAction) -> Self {
        let (endpoint, prefix) = match action {
            CartAction::Add(_) => ("/cart/add", "add-to-cart"),
            CartAction::Increment(_) => ("/cart/increment", "quantity-increase"),
            CartAction::Decrement(_) => ("/cart/decrement", "quantity-decrease"),
            CartAction::Remove(_) => ("/cart/remove", "delete-item"),
        };
        let product_id = action.product_id();

        Self {
            endpoint,
            element_id: format!("{prefix}-{product_id}"),
            product_id,
        }
    }
}

// =============================================================================
// Product grid
// =============================================================================

/// One product card.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    /// Full title, used as image alt text.
    pub title: String,
    pub short_title: String,
    pub short_description: String,
    pub price: String,
    pub image: String,
    pub add_to_cart: ControlView,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            short_title: truncate_with_ellipsis(&product.title, TITLE_PREVIEW_CHARS).into_owned(),
            short_description: truncate_with_ellipsis(
                &product.description,
                DESCRIPTION_PREVIEW_CHARS,
            )
            .into_owned(),
            price: product.price.to_string(),
            image: product.image.clone(),
            add_to_cart: ControlView::from(CartAction::Add(product.id)),
        }
    }
}

/// A category filter control.
#[derive(Debug, Clone)]
pub struct CategoryLinkView {
    pub label: String,
    /// URL-encoded `category` query value.
    pub query: String,
    pub active: bool,
}

impl CategoryLinkView {
    fn new(label: &str, filter: &CategoryFilter, active: &CategoryFilter) -> Self {
        Self {
            label: label.to_string(),
            query: url::form_urlencoded::byte_serialize(filter.as_query().as_bytes()).collect(),
            active: filter == active,
        }
    }
}

/// The product grid with its category filter controls.
#[derive(Debug, Clone)]
pub struct ProductGridView {
    pub cards: Vec<ProductCardView>,
    pub categories: Vec<CategoryLinkView>,
}

impl ProductGridView {
    /// Render the cards passing `filter`, in catalog order.
    #[must_use]
    pub fn render(catalog: &Catalog, filter: &CategoryFilter) -> Self {
        let cards = catalog
            .filter_by_category(filter)
            .into_iter()
            .map(ProductCardView::from)
            .collect();

        let categories = std::iter::once(CategoryLinkView::new(
            "All",
            &CategoryFilter::All,
            filter,
        ))
        .chain(catalog.categories().into_iter().map(|category| {
            CategoryLinkView::new(category, &CategoryFilter::Named(category.to_string()), filter)
        }))
        .collect();

        Self { cards, categories }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// =============================================================================
// Cart badge
// =============================================================================

/// The item count shown next to the cart icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartBadgeView {
    pub count: u64,
}

impl CartBadgeView {
    /// Badge text, e.g. `" (3)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(" ({})", self.count)
    }
}

impl From<&Cart> for CartBadgeView {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.total_item_count(),
        }
    }
}

// =============================================================================
// Cart table
// =============================================================================

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub decrease: ControlView,
    pub increase: ControlView,
    pub delete: ControlView,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            title: line.title.clone(),
            image: line.image.clone(),
            price: line.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
            decrease: ControlView::from(CartAction::Decrement(line.id)),
            increase: ControlView::from(CartAction::Increment(line.id)),
            delete: ControlView::from(CartAction::Remove(line.id)),
        }
    }
}

/// The cart table with its subtotal footer.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            item_count: cart.total_item_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use shopfront_core::Price;

    use super::*;

    fn product(id: i32, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: "d".repeat(120),
            price: Price::from_cents(1000),
            image: format!("https://img.example/{id}.jpg"),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("Mug", 15), "Mug");
        assert_eq!(truncate_with_ellipsis("exactly 15 char", 15), "exactly 15 char");
        assert!(matches!(truncate_with_ellipsis("Mug", 15), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(
            truncate_with_ellipsis("Fjallraven - Foldsack No. 1 Backpack", 15),
            "Fjallraven - Fo..."
        );
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_with_ellipsis("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_product_card() {
        let card = ProductCardView::from(&product(1, "Fjallraven - Foldsack No. 1", "bags"));
        assert_eq!(card.short_title, "Fjallraven - Fo...");
        assert_eq!(card.title, "Fjallraven - Foldsack No. 1");
        assert_eq!(card.short_description.chars().count(), 103);
        assert!(card.short_description.ends_with("..."));
        assert_eq!(card.price, "$10.00");
        assert_eq!(card.add_to_cart.endpoint, "/cart/add");
        assert_eq!(card.add_to_cart.element_id, "add-to-cart-1");
    }

    #[test]
    fn test_controls_per_action() {
        let id = ProductId::new(7);
        let ids: Vec<(&str, String)> = [
            CartAction::Add(id),
            CartAction::Increment(id),
            CartAction::Decrement(id),
            CartAction::Remove(id),
        ]
        .into_iter()
        .map(ControlView::from)
        .map(|control| (control.endpoint, control.element_id))
        .collect();

        assert_eq!(
            ids,
            vec![
                ("/cart/add", "add-to-cart-7".to_string()),
                ("/cart/increment", "quantity-increase-7".to_string()),
                ("/cart/decrement", "quantity-decrease-7".to_string()),
                ("/cart/remove", "delete-item-7".to_string()),
            ]
        );
    }

    #[test]
    fn test_grid_filter_and_categories() {
        let catalog = Catalog::new(vec![
            product(1, "Ring", "jewelery"),
            product(2, "Jacket", "men's clothing"),
            product(3, "Necklace", "jewelery"),
        ]);

        let grid = ProductGridView::render(
            &catalog,
            &CategoryFilter::Named("jewelery".to_string()),
        );
        let ids: Vec<i32> = grid.cards.iter().map(|c| c.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);

        let links: Vec<(&str, &str, bool)> = grid
            .categories
            .iter()
            .map(|l| (l.label.as_str(), l.query.as_str(), l.active))
            .collect();
        assert_eq!(
            links,
            vec![
                ("All", "all", false),
                ("jewelery", "jewelery", true),
                ("men's clothing", "men%27s+clothing", false),
            ]
        );
    }

    #[test]
    fn test_grid_empty_catalog() {
        let grid = ProductGridView::render(&Catalog::default(), &CategoryFilter::All);
        assert!(grid.is_empty());
        assert_eq!(grid.categories.len(), 1);
        assert!(grid.categories.iter().all(|l| l.active));
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(CartBadgeView { count: 0 }.label(), " (0)");
        assert_eq!(CartBadgeView { count: 12 }.label(), " (12)");
    }

    #[test]
    fn test_cart_view() {
        let catalog = Catalog::new(vec![product(1, "Ring", "jewelery")]);
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(1));
        cart.add_item(&catalog, ProductId::new(1));

        let view = CartView::from(&cart);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].price, "$10.00");
        assert_eq!(view.items[0].line_total, "$20.00");
        assert_eq!(view.items[0].decrease.element_id, "quantity-decrease-1");
        assert_eq!(view.subtotal, "$20.00");
        assert_eq!(view.item_count, 2);
    }
}

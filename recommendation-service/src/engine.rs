// ============================================================================
// Recommendation engine (mock)
// ============================================================================
//
// Hybrid scoring over a fixed demo catalog: collaborative filtering picks
// products from categories the user has touched, content-based filtering
// matches tags against the cart, and the remaining slots fill with the
// highest-rated products. Scores are positional (0.95, 0.90, ...), not
// learned.
//
// ============================================================================

use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
    pub rating: f64,
    pub image_url: &'static str,
    pub tags: &'static [&'static str],
}

pub const CATALOG: &[CatalogProduct] = &[
    CatalogProduct {
        id: "prod-1",
        name: "Wireless Headphones",
        price: 199.99,
        category: "Electronics",
        rating: 4.5,
        image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=300&fit=crop",
        tags: &["audio", "wireless", "music", "noise-cancelling"],
    },
    CatalogProduct {
        id: "prod-2",
        name: "Smartphone",
        price: 799.99,
        category: "Electronics",
        rating: 4.7,
        image_url: "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=300&fit=crop",
        tags: &["mobile", "communication", "camera", "apps"],
    },
    CatalogProduct {
        id: "prod-3",
        name: "Running Shoes",
        price: 129.99,
        category: "Sports",
        rating: 4.3,
        image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=300&fit=crop",
        tags: &["fitness", "running", "comfort", "athletic"],
    },
    CatalogProduct {
        id: "prod-4",
        name: "Coffee Maker",
        price: 89.99,
        category: "Home & Kitchen",
        rating: 4.4,
        image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400&h=300&fit=crop",
        tags: &["coffee", "kitchen", "appliance", "brewing"],
    },
    CatalogProduct {
        id: "prod-5",
        name: "Laptop",
        price: 1299.99,
        category: "Electronics",
        rating: 4.6,
        image_url: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=400&h=300&fit=crop",
        tags: &["computer", "work", "productivity", "portable"],
    },
    CatalogProduct {
        id: "prod-6",
        name: "Yoga Mat",
        price: 39.99,
        category: "Sports",
        rating: 4.2,
        image_url: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=400&h=300&fit=crop",
        tags: &["yoga", "fitness", "exercise", "meditation"],
    },
    CatalogProduct {
        id: "prod-7",
        name: "Bluetooth Speaker",
        price: 79.99,
        category: "Electronics",
        rating: 4.1,
        image_url: "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=400&h=300&fit=crop",
        tags: &["audio", "portable", "wireless", "music"],
    },
    CatalogProduct {
        id: "prod-8",
        name: "Kitchen Knife Set",
        price: 149.99,
        category: "Home & Kitchen",
        rating: 4.8,
        image_url: "https://images.unsplash.com/photo-1594736797933-d0401ba2fe65?w=400&h=300&fit=crop",
        tags: &["cooking", "kitchen", "tools", "sharp"],
    },
];

fn find(id: &str) -> Option<&'static CatalogProduct> {
    CATALOG.iter().find(|p| p.id == id)
}

fn reason_for(product: &CatalogProduct, user_categories: &HashSet<&str>) -> String {
    if user_categories.contains(product.category) {
        return format!("Based on your interest in {}", product.category);
    }

    let generic = [
        format!("Popular in {}", product.category),
        format!("Highly rated ({}/5)", product.rating),
        "Trending now".to_string(),
        "Customers also bought".to_string(),
        "Based on your interests".to_string(),
    ];
    generic
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| "Trending now".to_string())
}

/// Builds up to `limit` recommendations, never suggesting anything the user
/// already viewed, purchased or carted.
pub fn personalized(
    viewed: &[String],
    purchased: &[String],
    cart: &[String],
    limit: usize,
) -> Vec<Value> {
    let seen: HashSet<&str> = viewed
        .iter()
        .chain(purchased)
        .map(String::as_str)
        .collect();

    let user_categories: HashSet<&str> = seen
        .iter()
        .filter_map(|id| find(id))
        .map(|p| p.category)
        .collect();

    let mut picked: Vec<&CatalogProduct> = Vec::new();
    let mut picked_ids: HashSet<&str> = HashSet::new();
    fn push<'a>(p: &'a CatalogProduct, picked: &mut Vec<&'a CatalogProduct>, ids: &mut HashSet<&'a str>) {
        if ids.insert(p.id) {
            picked.push(p);
        }
    }

    // Collaborative: products from the user's preferred categories
    if !user_categories.is_empty() {
        for p in CATALOG
            .iter()
            .filter(|p| user_categories.contains(p.category) && !seen.contains(p.id))
            .take(limit / 2)
        {
            push(p, &mut picked, &mut picked_ids);
        }
    }

    // Content-based: products sharing tags with the cart
    if !cart.is_empty() {
        let cart_ids: HashSet<&str> = cart.iter().map(String::as_str).collect();
        let cart_tags: HashSet<&str> = cart_ids
            .iter()
            .filter_map(|id| find(id))
            .flat_map(|p| p.tags.iter().copied())
            .collect();

        for p in CATALOG
            .iter()
            .filter(|p| {
                !cart_ids.contains(p.id) && p.tags.iter().any(|t| cart_tags.contains(t))
            })
            .take(limit / 2)
        {
            push(p, &mut picked, &mut picked_ids);
        }
    }

    // Fill remaining slots with the top-rated products
    if picked.len() < limit {
        let mut trending: Vec<&CatalogProduct> = CATALOG.iter().collect();
        trending.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
        for p in trending {
            if picked.len() >= limit {
                break;
            }
            if !seen.contains(p.id) {
                push(p, &mut picked, &mut picked_ids);
            }
        }
    }

    picked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| {
            let mut value = json!(p);
            let score = ((0.95 - i as f64 * 0.05) * 100.0).round() / 100.0;
            value["recommendation_score"] = json!(score);
            value["recommendation_reason"] = json!(reason_for(p, &user_categories));
            value
        })
        .collect()
}

// ============================================================================
// Visual search engine (mock)
// ============================================================================
//
// No model runs here. "Analysis" rolls plausible colors, shapes and a style,
// then matches them against hand-labeled visual features on a fixed demo
// catalog. Products clear a minimum match score before they rank.
//
// ============================================================================

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct VisualProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
    pub image_url: &'static str,
    pub visual_features: &'static [&'static str],
    pub color_palette: &'static [&'static str],
    pub shape_features: &'static [&'static str],
}

pub const CATALOG: &[VisualProduct] = &[
    VisualProduct {
        id: "prod-1",
        name: "Wireless Headphones",
        price: 199.99,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=300&fit=crop",
        visual_features: &["black", "circular", "headband", "cushioned", "wireless"],
        color_palette: &["#000000", "#333333", "#666666"],
        shape_features: &["circular", "curved", "padded"],
    },
    VisualProduct {
        id: "prod-2",
        name: "Smartphone",
        price: 799.99,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=300&fit=crop",
        visual_features: &["rectangular", "screen", "sleek", "modern", "black"],
        color_palette: &["#000000", "#1a1a1a", "#333333"],
        shape_features: &["rectangular", "flat", "smooth"],
    },
    VisualProduct {
        id: "prod-3",
        name: "Running Shoes",
        price: 129.99,
        category: "Sports",
        image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=300&fit=crop",
        visual_features: &["red", "white", "athletic", "laced", "sporty"],
        color_palette: &["#ff0000", "#ffffff", "#cccccc"],
        shape_features: &["curved", "textured", "flexible"],
    },
    VisualProduct {
        id: "prod-4",
        name: "Coffee Maker",
        price: 89.99,
        category: "Home & Kitchen",
        image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400&h=300&fit=crop",
        visual_features: &["white", "cylindrical", "appliance", "modern", "sleek"],
        color_palette: &["#ffffff", "#f0f0f0", "#e0e0e0"],
        shape_features: &["cylindrical", "vertical", "smooth"],
    },
    VisualProduct {
        id: "prod-5",
        name: "Laptop",
        price: 1299.99,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=400&h=300&fit=crop",
        visual_features: &["silver", "rectangular", "screen", "keyboard", "portable"],
        color_palette: &["#c0c0c0", "#e0e0e0", "#f0f0f0"],
        shape_features: &["rectangular", "flat", "hinged"],
    },
    VisualProduct {
        id: "prod-6",
        name: "Yoga Mat",
        price: 39.99,
        category: "Sports",
        image_url: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=400&h=300&fit=crop",
        visual_features: &["purple", "rectangular", "textured", "flexible", "mat"],
        color_palette: &["#800080", "#9932cc", "#ba55d3"],
        shape_features: &["rectangular", "flat", "textured"],
    },
];

#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub dominant_colors: Vec<&'static str>,
    pub detected_shapes: Vec<&'static str>,
    pub style_classification: &'static str,
    pub confidence: f64,
    pub texture: &'static str,
}

impl ImageAnalysis {
    pub fn to_json(&self) -> Value {
        json!({
            "dominant_colors": self.dominant_colors,
            "detected_shapes": self.detected_shapes,
            "style_classification": self.style_classification,
            "confidence": self.confidence,
            "object_detection": ["product", "item"],
            "texture_analysis": self.texture,
        })
    }
}

/// Rolls a plausible analysis for any image input.
pub fn analyze_image() -> ImageAnalysis {
    const COLORS: &[&str] = &["red", "blue", "green", "black", "white", "silver", "purple"];
    const SHAPES: &[&str] = &["rectangular", "circular", "curved", "angular", "smooth"];
    const STYLES: &[&str] = &["modern", "classic", "sporty", "elegant", "casual"];
    const TEXTURES: &[&str] = &["smooth", "textured", "glossy", "matte"];

    let mut rng = rand::thread_rng();
    ImageAnalysis {
        dominant_colors: COLORS.choose_multiple(&mut rng, 2).copied().collect(),
        detected_shapes: SHAPES.choose_multiple(&mut rng, 2).copied().collect(),
        style_classification: STYLES.choose(&mut rng).copied().unwrap_or("modern"),
        confidence: (rng.gen_range(0.75..0.95_f64) * 1000.0).round() / 1000.0,
        texture: TEXTURES.choose(&mut rng).copied().unwrap_or("smooth"),
    }
}

/// Scores the catalog against an analysis: colors weigh 0.3 each, shapes 0.2,
/// style 0.3. Products below 0.2 are dropped.
pub fn find_matches(analysis: &ImageAnalysis, limit: usize) -> Vec<Value> {
    let mut matches: Vec<(f64, &VisualProduct)> = Vec::new();

    for product in CATALOG {
        let mut score: f64 = 0.0;

        for color in &analysis.dominant_colors {
            if product.visual_features.iter().any(|f| f.contains(color)) {
                score += 0.3;
            }
        }
        for shape in &analysis.detected_shapes {
            if product.shape_features.iter().any(|f| f.contains(shape)) {
                score += 0.2;
            }
        }
        if product
            .visual_features
            .iter()
            .any(|f| f.contains(analysis.style_classification))
        {
            score += 0.3;
        }

        if score > 0.2 {
            matches.push(((score * 1000.0).round() / 1000.0, product));
        }
    }

    matches.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    matches
        .into_iter()
        .take(limit)
        .map(|(score, product)| {
            let mut value = json!(product);
            value["match_score"] = json!(score);
            value["match_confidence"] =
                json!(((score * analysis.confidence) * 1000.0).round() / 1000.0);
            value
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_analysis() -> ImageAnalysis {
        ImageAnalysis {
            dominant_colors: vec!["black", "silver"],
            detected_shapes: vec!["rectangular", "curved"],
            style_classification: "modern",
            confidence: 0.9,
            texture: "smooth",
        }
    }

    #[test]
    fn matches_are_ranked_and_capped() {
        let matches = find_matches(&fixed_analysis(), 3);
        assert!(matches.len() <= 3);
        assert!(!matches.is_empty());

        let scores: Vec<f64> = matches
            .iter()
            .map(|m| m["match_score"].as_f64().unwrap())
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn weak_matches_are_dropped() {
        let analysis = ImageAnalysis {
            dominant_colors: vec!["green", "blue"],
            detected_shapes: vec!["spherical", "conical"],
            style_classification: "casual",
            confidence: 0.8,
            texture: "matte",
        };
        // Nothing in the catalog is green, blue, spherical, conical or casual
        assert!(find_matches(&analysis, 6).is_empty());
    }

    #[test]
    fn confidence_scales_the_match() {
        let matches = find_matches(&fixed_analysis(), 1);
        let m = &matches[0];
        let score = m["match_score"].as_f64().unwrap();
        let confidence = m["match_confidence"].as_f64().unwrap();
        assert!((confidence - score * 0.9).abs() < 0.001);
    }

    #[test]
    fn analysis_stays_in_bounds() {
        for _ in 0..20 {
            let a = analyze_image();
            assert_eq!(a.dominant_colors.len(), 2);
            assert_eq!(a.detected_shapes.len(), 2);
            assert!((0.75..=0.95).contains(&a.confidence));
        }
    }
}

use std::collections::HashSet;

use gallery_core::{
    default_dimensions, DescriptorSource, Dimensions, ImageCatalog, ImageSource, ImageVariant,
    UrlGenerator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use url::Url;

#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Plain,
    Grayscale,
    Blur(u8),
}

/// Classifies a generated URL, panicking if it matches none of the templates.
fn classify(raw: &str) -> (Dimensions, u32, Shape) {
    let url = Url::parse(raw).expect("valid url");
    let segments: Vec<_> = url.path_segments().expect("path").collect();
    assert_eq!(segments.len(), 2, "unexpected path in {raw}");
    let dims = Dimensions::new(segments[0].parse().unwrap(), segments[1].parse().unwrap());

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs[0].0, "random", "first query key in {raw}");
    let seed: u32 = pairs[0].1.parse().unwrap();

    let shape = match pairs.get(1) {
        None => Shape::Plain,
        Some((key, value)) if key == "grayscale" && value.is_empty() => Shape::Grayscale,
        Some((key, value)) if key == "blur" => Shape::Blur(value.parse().unwrap()),
        Some(other) => panic!("unknown query pair {other:?} in {raw}"),
    };
    assert!(pairs.len() <= 2, "too many query pairs in {raw}");
    (dims, seed, shape)
}

#[test]
fn generated_urls_always_match_known_templates() {
    let mut generator = UrlGenerator::new(ImageCatalog::default(), StdRng::seed_from_u64(7));
    let catalog_dims = default_dimensions();
    let mut seen_shapes = HashSet::new();

    for _ in 0..2_000 {
        let descriptor = generator.generate();
        assert!(descriptor.url.starts_with("https://picsum.photos/"));
        let (dims, seed, shape) = classify(&descriptor.url);

        assert!(catalog_dims.contains(&dims));
        assert_eq!(dims, descriptor.dimensions);
        assert!(seed < 1000);
        assert!(descriptor.category.ends_with(&format!("_{seed}")));

        match shape {
            Shape::Plain => assert_eq!(descriptor.source_name, "picsum"),
            Shape::Grayscale => assert_eq!(descriptor.source_name, "picsum_grayscale"),
            Shape::Blur(level) => {
                assert_eq!(descriptor.source_name, "picsum_blur");
                assert!((1..=5).contains(&level));
            }
        }
        seen_shapes.insert(std::mem::discriminant(&shape));
    }

    assert_eq!(seen_shapes.len(), 3);
}

#[test]
fn plain_categories_come_from_the_catalog() {
    let mut generator = UrlGenerator::new(ImageCatalog::default(), StdRng::seed_from_u64(11));
    for _ in 0..500 {
        let d = generator.next_descriptor();
        let (tag, _seed) = d.category.rsplit_once('_').unwrap();
        match d.source_name.as_str() {
            "picsum" => {
                let n: u32 = tag.strip_prefix("random").unwrap().parse().unwrap();
                assert!((1..=10).contains(&n));
            }
            "picsum_grayscale" => assert_eq!(tag, "grayscale"),
            "picsum_blur" => assert_eq!(tag, "blur"),
            other => panic!("unexpected source {other}"),
        }
    }
}

#[test]
fn same_seed_gives_same_sequence() {
    let mut a = UrlGenerator::new(ImageCatalog::default(), StdRng::seed_from_u64(42));
    let mut b = UrlGenerator::new(ImageCatalog::default(), StdRng::seed_from_u64(42));
    for _ in 0..50 {
        assert_eq!(a.generate(), b.generate());
    }
}

#[test]
fn custom_base_url_is_used_without_trailing_slash() {
    let catalog = ImageCatalog::with_base_url("http://127.0.0.1:9000/");
    let mut generator = UrlGenerator::new(catalog, StdRng::seed_from_u64(1));
    let d = generator.generate();
    assert!(d.url.starts_with("http://127.0.0.1:9000/"));
    assert!(!d.url.contains("9000//"));
}

#[test]
fn empty_catalog_falls_back_to_default() {
    let catalog = ImageCatalog {
        sources: vec![ImageSource::new(
            "empty",
            "https://x",
            ImageVariant::Plain,
            Vec::<String>::new(),
        )],
        dimensions: vec![],
    };
    let generator = UrlGenerator::new(catalog, StdRng::seed_from_u64(3));
    assert_eq!(generator.catalog(), &ImageCatalog::default());
}

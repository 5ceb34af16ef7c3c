use serde::Deserialize;

// script[data-testid="hdp-seo-product-schema"]
//  ├── name          (full postal address)
//  ├── description   (long-form listing text)
//  └── ...           (offers, image, url: ignored)

#[derive(Debug, Deserialize)]
pub struct ProductSchema {
    pub name: Option<String>,
    pub description: Option<String>,
}

//! Fixture catalogue and accounts loaded into a fresh store.

use chrono::Utc;

use crate::store::{Account, Image, Product, Review, Store, User};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin12345";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "user12345";

/// Fixed ObjectId-shaped identifier for the `n`th seed record.
pub fn seed_id(n: u8) -> String {
    format!("64f0c0de00000000000000{n:02x}")
}

fn image(slug: &str) -> Image {
    Image {
        public_id: format!("products/{slug}"),
        url: format!("https://res.example.com/products/{slug}.jpg"),
    }
}

fn product(n: u8, name: &str, category: &str, price: f64, ratings: f64, stock: u32, description: &str) -> Product {
    let reviews = if ratings > 0.0 {
        vec![Review {
            user: seed_id(101),
            name: "Sample Shopper".to_string(),
            rating: ratings,
            comment: format!("{name} does what it says."),
        }]
    } else {
        Vec::new()
    };
    Product {
        id: seed_id(n),
        name: name.to_string(),
        description: description.to_string(),
        price,
        ratings,
        images: vec![image(&name.to_lowercase().replace(' ', "-"))],
        category: category.to_string(),
        stock,
        num_of_reviews: reviews.len() as u32,
        reviews,
        created_at: Utc::now(),
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(1, "Ultrabook 14", "Laptop", 1199.0, 4.5, 12, "Thin and light 14 inch laptop."),
        product(2, "Trail Runner", "Footwear", 89.0, 4.0, 40, "Grippy trail running shoe."),
        product(3, "Noise Cancelling Headphones", "Electronics", 249.0, 4.8, 25, "Over-ear wireless headphones."),
        product(4, "Mirrorless Camera", "Camera", 899.0, 4.2, 5, "24MP mirrorless body."),
        product(5, "Rain Jacket", "Attire", 129.0, 3.5, 18, "Packable waterproof shell."),
        product(6, "USB-C Charger", "Electronics", 35.0, 3.9, 100, "65W fast charger."),
        product(7, "Smartwatch", "Electronics", 299.0, 4.1, 30, "Fitness tracking smartwatch."),
        product(8, "Desk Lamp", "Electronics", 45.0, 0.0, 60, "Dimmable LED desk lamp."),
        product(9, "Gaming Laptop", "Laptop", 1799.0, 4.6, 7, "High refresh rate gaming laptop."),
        product(10, "Leather Boots", "Footwear", 159.0, 4.4, 22, "Waterproof leather boots."),
    ]
}

pub fn accounts() -> Vec<Account> {
    vec![
        Account {
            user: User {
                id: seed_id(100),
                name: "Store Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                avatar: None,
                role: "admin".to_string(),
                created_at: Utc::now(),
            },
            password: ADMIN_PASSWORD.to_string(),
        },
        Account {
            user: User {
                id: seed_id(101),
                name: "Sample Shopper".to_string(),
                email: USER_EMAIL.to_string(),
                avatar: None,
                role: "user".to_string(),
                created_at: Utc::now(),
            },
            password: USER_PASSWORD.to_string(),
        },
    ]
}

pub fn store() -> Store {
    Store {
        products: products(),
        accounts: accounts(),
        ..Store::default()
    }
}

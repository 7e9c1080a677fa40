//! Reference information shown next to a verdict.

use serde::Serialize;

use crate::types::FruitKind;

/// Display information about one kind of fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitInfo {
    /// Display name.
    pub name: &'static str,
    /// One-paragraph overview.
    pub description: &'static str,
    /// Common cultivars, comma-separated.
    pub varieties: &'static str,
    /// Typical flavor and texture.
    pub taste: &'static str,
    /// How to store it and for how long.
    pub storage: &'static str,
    /// What to look for when judging ripeness.
    pub ripeness_indicators: &'static str,
}

const APPLE: FruitInfo = FruitInfo {
    name: "Apple",
    description: "Apples are one of the most popular fruits worldwide, known for their crisp \
                  texture and sweet-tart flavor. They come in thousands of varieties, each with \
                  unique characteristics.",
    varieties: "Gala, Fuji, Granny Smith, Honeycrisp, Red Delicious, Golden Delicious",
    taste: "Ranges from sweet to tart depending on variety, with a crisp, juicy texture",
    storage: "Store in the refrigerator for up to 4-6 weeks. Keep away from other produce as \
              they emit ethylene gas.",
    ripeness_indicators: "Firm to touch, vibrant color, no soft spots or bruises. Ripe apples \
                          should have a sweet aroma.",
};

const BANANA: FruitInfo = FruitInfo {
    name: "Banana",
    description: "Bananas are tropical fruits with a distinctive curved shape and creamy \
                  texture. They are rich in potassium and provide quick energy.",
    varieties: "Cavendish, Plantain, Lady Finger, Red Banana, Burro",
    taste: "Sweet and creamy with a soft, smooth texture when ripe",
    storage: "Store at room temperature. Refrigerate only when fully ripe to slow further \
              ripening.",
    ripeness_indicators: "Yellow skin with small brown spots indicates peak ripeness. Green \
                          bananas are unripe, while heavily spotted or brown bananas are \
                          overripe.",
};

const ORANGE: FruitInfo = FruitInfo {
    name: "Orange",
    description: "Oranges are citrus fruits prized for their sweet-tart juice and high \
                  vitamin C content, with a bright peel and segmented flesh.",
    varieties: "Navel, Valencia, Blood Orange, Cara Cara, Mandarin",
    taste: "Sweet and tangy with juicy, refreshing flesh",
    storage: "Store at room temperature for up to a week, or refrigerate for 2-3 weeks.",
    ripeness_indicators: "Heavy for their size, firm with slight give, vibrant orange color. \
                          Avoid oranges with soft spots or mold.",
};

const STRAWBERRY: FruitInfo = FruitInfo {
    name: "Strawberry",
    description: "Strawberries are known for their bright red color, juicy texture, and \
                  sweet flavor. They are rich in antioxidants and vitamin C.",
    varieties: "Albion, Chandler, Seascape, Jewel, Camarosa",
    taste: "Sweet and slightly tart with a juicy, tender texture",
    storage: "Refrigerate unwashed in a breathable container. Use within 3-5 days for best \
              quality.",
    ripeness_indicators: "Bright red color throughout, fresh green caps, firm texture. Avoid \
                          berries with white or green areas, or signs of mold.",
};

const GRAPES: FruitInfo = FruitInfo {
    name: "Grapes",
    description: "Grapes are small, round fruits that grow in clusters. They come in green, \
                  red, and purple, and are eaten fresh, dried as raisins, or made into wine.",
    varieties: "Thompson Seedless, Red Globe, Concord, Flame Seedless, Cotton Candy",
    taste: "Sweet and juicy, with some varieties having a slight tartness",
    storage: "Refrigerate unwashed in a perforated bag. Can last 1-2 weeks when properly \
              stored.",
    ripeness_indicators: "Plump and firmly attached to stems, consistent color, slight bloom. \
                          Avoid shriveled or brown grapes.",
};

const PEACH: FruitInfo = FruitInfo {
    name: "Peach",
    description: "Peaches are stone fruits with fuzzy skin and sweet, juicy flesh, eaten \
                  fresh or used in desserts and preserves.",
    varieties: "Elberta, Redhaven, O'Henry, Donut Peach, White Peach",
    taste: "Sweet and juicy with a delicate, aromatic flavor",
    storage: "Ripen at room temperature, then refrigerate for up to 5 days. Handle gently to \
              avoid bruising.",
    ripeness_indicators: "Slight give when gently pressed, sweet aroma, golden or rosy color. \
                          Avoid hard or overly soft peaches.",
};

const PEAR: FruitInfo = FruitInfo {
    name: "Pear",
    description: "Pears are sweet fruits with a bell shape and smooth texture. They ripen \
                  best off the tree, developing a buttery texture.",
    varieties: "Bartlett, Anjou, Bosc, Comice, Asian Pear",
    taste: "Sweet and juicy with a smooth, buttery texture when ripe",
    storage: "Ripen at room temperature, then refrigerate for up to 5 days. Check daily for \
              ripeness.",
    ripeness_indicators: "Gentle give near the stem when pressed, sweet aroma. Color varies \
                          by variety. Avoid pears with bruises or overly soft spots.",
};

const PLUM: FruitInfo = FruitInfo {
    name: "Plum",
    description: "Plums are stone fruits with smooth skin ranging from deep purple to golden \
                  yellow, eaten fresh or dried as prunes.",
    varieties: "Santa Rosa, Black Amber, Elephant Heart, Damson, Mirabelle",
    taste: "Sweet-tart with juicy flesh, flavor intensifies when fully ripe",
    storage: "Ripen at room temperature, then refrigerate for up to 5 days.",
    ripeness_indicators: "Slight give when gently pressed, sweet aroma, vibrant color with \
                          slight bloom. Avoid hard or overly soft plums.",
};

/// Fallback for labels that do not name a known fruit.
pub const GENERIC: FruitInfo = FruitInfo {
    name: "Fruit",
    description: "Fresh fruits provide vitamins, minerals, fiber, and antioxidants. Each \
                  fruit has its own nutritional benefits and flavor profile.",
    varieties: "Thousands of fruit varieties exist worldwide",
    taste: "Varies widely from sweet to tart, with diverse textures",
    storage: "Most fruits should be stored in a cool, dry place or refrigerated. Avoid \
              washing until ready to eat.",
    ripeness_indicators: "Look for vibrant color, pleasant aroma, and appropriate firmness. \
                          Avoid fruits with bruises, mold, or off-odors.",
};

impl FruitKind {
    /// Reference information for this fruit.
    #[must_use]
    pub const fn info(self) -> &'static FruitInfo {
        match self {
            Self::Apple => &APPLE,
            Self::Banana => &BANANA,
            Self::Orange => &ORANGE,
            Self::Strawberry => &STRAWBERRY,
            Self::Grapes => &GRAPES,
            Self::Peach => &PEACH,
            Self::Pear => &PEAR,
            Self::Plum => &PLUM,
        }
    }
}

/// Look up reference information by label, case-insensitively.
///
/// Unknown labels get [`GENERIC`].
#[must_use]
pub fn fruit_info(label: &str) -> &'static FruitInfo {
    label.parse::<FruitKind>().map_or(&GENERIC, FruitKind::info)
}

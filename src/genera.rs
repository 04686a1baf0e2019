/// Curated Lactobacillaceae genera used as the row index of the combined
/// table. Order is output order.
pub const FIXED_GENERA: [&str; 36] = [
    "Lactobacillus",
    "Amylolactobacillus",
    "Holzapfeliella",
    "Xylocopilactobacillus",
    "Bombilactobacillus",
    "Companilactobacillus",
    "Lapidilactobacillus",
    "Agrilactobacillus",
    "Schleiferilactobacillus",
    "Lacticaseibacillus",
    "Paralactobacillus",
    "Latilactobacillus",
    "Loigolactobacillus",
    "Dellaglioa",
    "Liquorilactobacillus",
    "Ligilactobacillus",
    "Pediococcus",
    "Lactiplantibacillus",
    "Fructilactobacillus",
    "Acetilactobacillus",
    "Philodulcilactobacillus",
    "Nicoliella",
    "Apilactobacillus",
    "Lentilactobacillus",
    "Secundilactobacillus",
    "Levilactobacillus",
    "Paucilactobacillus",
    "Limosilactobacillus",
    "Furfurilactobacillus",
    "Periweissella",
    "Weissella",
    "Oenococcus",
    "Eupransor",
    "Convivina",
    "Fructobacillus",
    "Leuconostoc",
];

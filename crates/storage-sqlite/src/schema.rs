diesel::table! {
    daily_prices (id) {
        id -> BigInt,
        symbol -> Text,
        date -> Text,
        price -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    transactions (id) {
        id -> BigInt,
        symbol -> Text,
        amount -> Text,
        price_at_purchase -> Text,
        purchased_at -> Text,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(daily_prices, transactions,);

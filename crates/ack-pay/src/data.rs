pub(crate) const TEST_PAYMENT_REQUEST: &str = r#"
{
    "id": "test-payment-request-id",
    "description": "Access to premium content",
    "serviceCallback": "https://server.example.com/callback",
    "paymentOptions": [
        {
            "id": "test-payment-option-id",
            "amount": 100,
            "decimals": 2,
            "currency": "USD",
            "recipient": "sol:2wKupLR9q6wXYppw8Gr2NvWxKBUqm4PPJKkQfoxHDBg4",
            "network": "solana",
            "receiptService": "https://receipts.example.com"
        },
        {
            "id": "test-payment-option-id-2",
            "amount": 1000000,
            "decimals": 6,
            "currency": "USDC",
            "recipient": "0x7D0B3a5C2d9E1f4A6b8c0d2E4F6a8B0c2D4e6F8a",
            "network": "eip155:84532",
            "paymentService": "did:web:payments.example.com"
        }
    ]
}
"#;

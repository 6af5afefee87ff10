pub(crate) const TEST_DID_DOCUMENT: &str = r#"
{
  "@context": ["https://www.w3.org/ns/did/v1"],
  "id": "did:web:example.com",
  "controller": "did:web:owner.example.com",
  "verificationMethod": [
    {
      "id": "did:web:example.com#jwk-1",
      "type": "EcdsaSecp256k1VerificationKey2019",
      "controller": "did:web:example.com",
      "publicKeyJwk": {
        "kty": "EC",
        "crv": "secp256k1",
        "x": "eZ5mi_Wq8vvlJDqVR2hdm10kvHmMu1aEsAqP2EmhElE",
        "y": "nkx5ghNQmb8xWptYb_Kf9lcRiLjVj7pbNFuUi-5NvUg"
      }
    }
  ],
  "authentication": ["did:web:example.com#jwk-1"],
  "assertionMethod": [
    "did:web:example.com#jwk-1",
    {
      "id": "did:web:example.com#hex-2",
      "type": "EcdsaSecp256k1VerificationKey2019",
      "controller": "did:web:example.com",
      "publicKeyHex": "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    }
  ],
  "keyAgreement": []
}
"#;

pub(crate) const TEST_CONTROLLER_DOCUMENT: &str = r#"
{
  "@context": ["https://www.w3.org/ns/did/v1"],
  "id": "did:web:owner.example.com"
}
"#;

pub(crate) const TEST_SELF_CONTROLLED_DOCUMENT: &str = r#"
{
  "id": "did:web:self.example.com",
  "controller": "did:web:self.example.com"
}
"#;

pub(crate) const TEST_MANY_CONTROLLERS_DOCUMENT: &str = r#"
{
  "id": "did:web:many.example.com",
  "controller": ["did:web:a.example.com", "did:web:b.example.com"]
}
"#;

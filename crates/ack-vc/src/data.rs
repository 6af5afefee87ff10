pub(crate) const TEST_CREDENTIAL: &str = r#"
{
    "@context": ["https://www.w3.org/2018/credentials/v1"],
    "id": "https://issuer.example.com/credentials/1",
    "type": ["VerifiableCredential", "TestCredential"],
    "issuer": "did:web:issuer.example.com",
    "issuanceDate": "2025-01-01T00:00:00.000Z",
    "credentialSubject": {
        "id": "did:web:subject.example.com",
        "test": "test"
    },
    "evidence": ["https://example.com/e"],
    "proof": {
        "type": "JwtProof2020",
        "jwt": "eyJhbGciOiJFUzI1NksifQ.eyJpc3MiOiJkaWQ6d2ViOmlzc3Vlci5leGFtcGxlLmNvbSJ9.c2ln"
    }
}
"#;

pub(crate) const TEST_REVOCABLE_CREDENTIAL: &str = r#"
{
    "@context": ["https://www.w3.org/2018/credentials/v1"],
    "type": ["VerifiableCredential"],
    "issuer": {"id": "did:web:issuer.example.com"},
    "issuanceDate": "2025-01-01T00:00:00.000Z",
    "credentialSubject": {"id": "did:web:subject.example.com"},
    "credentialStatus": {
        "id": "https://issuer.example.com/status/0#5",
        "type": "StatusList2021Entry",
        "statusPurpose": "revocation",
        "statusListIndex": "5",
        "statusListCredential": "https://issuer.example.com/status/0"
    }
}
"#;

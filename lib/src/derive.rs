// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Address derivation and display

use serde::{Deserialize, Serialize};

use ledger_ada_apdu::{
    compat::{require, Capabilities},
    ops::DeriveAddressP1,
    Instruction, Request, Version,
};

use crate::{
    address::{DeviceOwnedAddress, Network},
    interaction::{Call, Sequence},
    Error,
};

/// Derived address bytes, hex encoded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAddress {
    pub address_hex: String,
}

fn derive_request(
    version: &Version,
    network: &Network,
    address: &DeviceOwnedAddress,
    p1: DeriveAddressP1,
) -> Result<Request, Error> {
    let params = address.parse(network)?;

    if address.address_type.is_byron() {
        let caps = Capabilities::of(version);
        require(
            version,
            caps.supports_byron_address_derivation,
            "byron address derivation",
        )?;
    }

    Ok(Request::new(
        Instruction::DeriveAddress,
        p1 as u8,
        0x00,
        params.encode(version)?,
    ))
}

/// Derive an address, returning the address bytes
pub fn derive_address(
    version: &Version,
    network: &Network,
    address: &DeviceOwnedAddress,
) -> Result<Sequence<Option<DerivedAddress>, DerivedAddress>, Error> {
    let req = derive_request(version, network, address, DeriveAddressP1::Return)?;

    Ok(Sequence::new(
        None,
        [Call::new(req, |a: &mut Option<DerivedAddress>, r: &[u8]| {
            *a = Some(DerivedAddress {
                address_hex: hex::encode(r),
            });
            Ok(())
        })],
        |a| a.ok_or(crate::error::ProtocolError::InvalidResponse.into()),
    ))
}

/// Show an address on the device for user verification
pub fn show_address(
    version: &Version,
    network: &Network,
    address: &DeviceOwnedAddress,
) -> Result<Sequence<(), ()>, Error> {
    let req = derive_request(version, network, address, DeriveAddressP1::Display)?.expect(0);

    Ok(Sequence::new((), [Call::ack(req)], |_| Ok(())))
}

#[cfg(test)]
mod test {
    use ledger_ada_apdu::{address::AddressType, AppFlags, HARDENED as H};

    use crate::{
        address::AddressParams,
        interaction::{Interaction, Step},
    };

    use super::*;

    fn byron() -> DeviceOwnedAddress {
        DeviceOwnedAddress {
            address_type: AddressType::Byron,
            params: AddressParams {
                spending_path: Some(vec![44 | H, 1815 | H, H, 1, 0]),
                ..Default::default()
            },
        }
    }

    #[test]
    fn byron_unavailable_on_xs() {
        let xs = Version::new(4, 0, 0, AppFlags::IS_APP_XS);
        assert!(matches!(
            derive_address(&xs, &Network::MAINNET, &byron()),
            Err(Error::DeviceVersionUnsupported(_))
        ));

        let full = Version::new(4, 0, 0, AppFlags::empty());
        assert!(derive_address(&full, &Network::MAINNET, &byron()).is_ok());
    }

    #[test]
    fn show_expects_empty_response() {
        let v = Version::new(4, 0, 0, AppFlags::empty());
        let mut s = show_address(&v, &Network::MAINNET, &byron()).unwrap();

        match s.resume(None).unwrap() {
            Step::Send(r) => {
                assert_eq!(r.p1, 0x02);
                assert_eq!(r.expected_len, Some(0));
            }
            _ => panic!("expected request"),
        }
    }
}

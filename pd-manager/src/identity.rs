//! Partner identity, as given by a Discover Identity response.
//!
//! See [6.4.4.3.1].
use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;
use pd_manager_traits::class;
use proc_bitfield::bitfield;

/// Maximum number of product type VDOs that follow the product VDO.
pub const MAX_PRODUCT_TYPE_VDOS: usize = 3;

/// Size of the mandatory part (ID header, cert stat and product VDO).
const MANDATORY_SIZE: usize = 3 * 4;

/// Errors that can occur while parsing an identity.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The input buffer has an invalid length.
    /// * `expected` - The expected length (or lower bound).
    /// * `found` - The actual length found.
    #[error("invalid input buffer length (expected {expected:?}, found {found:?})")]
    InvalidLength {
        /// The expected length.
        expected: usize,
        /// The actual length found.
        found: usize,
    },
    /// The input is not made of whole data objects.
    #[error("input of {0} bytes is not a multiple of the data object size")]
    Misaligned(usize),
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    /// The ID header VDO.
    pub struct IdHeaderVdo(pub u32): Debug, FromStorage, IntoStorage {
        /// USB communications capable as host
        pub host_data: bool @ 31,
        /// USB communications capable as device
        pub device_data: bool @ 30,
        /// Product type as UFP
        pub product_type_ufp: u8 [get ProductTypeUfp] @ 27..=29,
        /// Modal operation supported
        pub modal_supported: bool @ 26,
        /// Product type as DFP
        pub product_type_dfp: u8 [get ProductTypeDfp] @ 23..=25,
        /// Connector type
        pub connector_type: u8 @ 21..=22,
        /// USB vendor ID
        pub vid: u16 @ 0..=15,
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    /// The cert stat VDO.
    pub struct CertStatVdo(pub u32): Debug, FromStorage, IntoStorage {
        /// Test ID, allocated by USB-IF
        pub xid: u32 @ 0..=31,
    }
}

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    /// The product VDO.
    pub struct ProductVdo(pub u32): Debug, FromStorage, IntoStorage {
        /// USB product ID
        pub pid: u16 @ 16..=31,
        /// Device release number
        pub bcd_device: u16 @ 0..=15,
    }
}

/// Product type of a partner acting as UFP.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProductTypeUfp {
    NotUfp,
    PdUsbHub,
    PdUsbPeripheral,
    Psd,
    Reserved(u8),
}

impl From<u8> for ProductTypeUfp {
    fn from(value: u8) -> Self {
        match value {
            0b000 => ProductTypeUfp::NotUfp,
            0b001 => ProductTypeUfp::PdUsbHub,
            0b010 => ProductTypeUfp::PdUsbPeripheral,
            0b011 => ProductTypeUfp::Psd,
            other => ProductTypeUfp::Reserved(other),
        }
    }
}

/// Product type of a partner acting as DFP.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProductTypeDfp {
    NotDfp,
    PdUsbHub,
    PdUsbHost,
    PowerBrick,
    Reserved(u8),
}

impl From<u8> for ProductTypeDfp {
    fn from(value: u8) -> Self {
        match value {
            0b000 => ProductTypeDfp::NotDfp,
            0b001 => ProductTypeDfp::PdUsbHub,
            0b010 => ProductTypeDfp::PdUsbHost,
            0b011 => ProductTypeDfp::PowerBrick,
            other => ProductTypeDfp::Reserved(other),
        }
    }
}

/// Identity of a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// ID header.
    pub id_header: IdHeaderVdo,
    /// Cert stat.
    pub cert_stat: CertStatVdo,
    /// Product.
    pub product: ProductVdo,
    /// Product type VDOs, raw.
    pub product_type_vdos: Vec<u32, MAX_PRODUCT_TYPE_VDOS>,
}

impl Identity {
    /// Parse an identity from the little-endian data objects that follow the VDM header.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, ParseError> {
        let max_size = MANDATORY_SIZE + 4 * MAX_PRODUCT_TYPE_VDOS;

        if buf.len() < MANDATORY_SIZE {
            return Err(ParseError::InvalidLength {
                expected: MANDATORY_SIZE,
                found: buf.len(),
            });
        }

        if buf.len() > max_size {
            return Err(ParseError::InvalidLength {
                expected: max_size,
                found: buf.len(),
            });
        }

        if buf.len() % 4 != 0 {
            return Err(ParseError::Misaligned(buf.len()));
        }

        let mut objects = buf.chunks_exact(4).map(LittleEndian::read_u32);

        // The length checks above guarantee the mandatory objects.
        let id_header = IdHeaderVdo(objects.next().unwrap_or_default());
        let cert_stat = CertStatVdo(objects.next().unwrap_or_default());
        let product = ProductVdo(objects.next().unwrap_or_default());

        Ok(Self {
            id_header,
            cert_stat,
            product,
            product_type_vdos: objects.collect(),
        })
    }
}

impl From<&Identity> for class::Identity {
    fn from(identity: &Identity) -> Self {
        class::Identity {
            id_header: identity.id_header.into(),
            cert_stat: identity.cert_stat.into(),
            product: identity.product.into(),
        }
    }
}

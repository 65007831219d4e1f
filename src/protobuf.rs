// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

//! Messages from AOSP's `update_metadata.proto`, reduced to the fields the
//! payload extractor consumes. The prost field tags match the upstream
//! schema, so these decode any full OTA manifest.

pub mod chromeos_update_engine {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Extent {
        #[prost(uint64, optional, tag = "1")]
        pub start_block: ::core::option::Option<u64>,
        #[prost(uint64, optional, tag = "2")]
        pub num_blocks: ::core::option::Option<u64>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct InstallOperation {
        #[prost(enumeration = "install_operation::Type", required, tag = "1")]
        pub r#type: i32,
        #[prost(uint64, optional, tag = "2")]
        pub data_offset: ::core::option::Option<u64>,
        #[prost(uint64, optional, tag = "3")]
        pub data_length: ::core::option::Option<u64>,
        #[prost(message, repeated, tag = "4")]
        pub src_extents: ::prost::alloc::vec::Vec<Extent>,
        #[prost(message, repeated, tag = "6")]
        pub dst_extents: ::prost::alloc::vec::Vec<Extent>,
        #[prost(bytes = "vec", optional, tag = "8")]
        pub data_sha256_hash: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    }

    pub mod install_operation {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
        )]
        #[repr(i32)]
        pub enum Type {
            Replace = 0,
            Move = 1,
            Bsdiff = 2,
            ReplaceBz = 3,
            SourceCopy = 4,
            SourceBsdiff = 5,
            Zero = 6,
            Discard = 7,
            ReplaceXz = 8,
            Puffdiff = 9,
            BrotliBsdiff = 10,
        }

        impl Type {
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    Self::Replace => "REPLACE",
                    Self::Move => "MOVE",
                    Self::Bsdiff => "BSDIFF",
                    Self::ReplaceBz => "REPLACE_BZ",
                    Self::SourceCopy => "SOURCE_COPY",
                    Self::SourceBsdiff => "SOURCE_BSDIFF",
                    Self::Zero => "ZERO",
                    Self::Discard => "DISCARD",
                    Self::ReplaceXz => "REPLACE_XZ",
                    Self::Puffdiff => "PUFFDIFF",
                    Self::BrotliBsdiff => "BROTLI_BSDIFF",
                }
            }
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PartitionInfo {
        #[prost(uint64, optional, tag = "1")]
        pub size: ::core::option::Option<u64>,
        #[prost(bytes = "vec", optional, tag = "2")]
        pub hash: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PartitionUpdate {
        #[prost(string, required, tag = "1")]
        pub partition_name: ::prost::alloc::string::String,
        #[prost(message, optional, tag = "6")]
        pub old_partition_info: ::core::option::Option<PartitionInfo>,
        #[prost(message, optional, tag = "7")]
        pub new_partition_info: ::core::option::Option<PartitionInfo>,
        #[prost(message, repeated, tag = "8")]
        pub operations: ::prost::alloc::vec::Vec<InstallOperation>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct DeltaArchiveManifest {
        #[prost(uint32, optional, tag = "3", default = "4096")]
        pub block_size: ::core::option::Option<u32>,
        #[prost(uint64, optional, tag = "4")]
        pub signatures_offset: ::core::option::Option<u64>,
        #[prost(uint64, optional, tag = "5")]
        pub signatures_size: ::core::option::Option<u64>,
        #[prost(uint32, optional, tag = "12", default = "0")]
        pub minor_version: ::core::option::Option<u32>,
        #[prost(message, repeated, tag = "13")]
        pub partitions: ::prost::alloc::vec::Vec<PartitionUpdate>,
    }
}
